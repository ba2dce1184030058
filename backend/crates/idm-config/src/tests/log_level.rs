use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, LogLevel};

use std::str::FromStr;

use googletest::assert_that;
use googletest::prelude::eq;
use log::LevelFilter;
use serial_test::serial;

#[test]
fn given_known_level_names_when_parsed_then_mapped_case_insensitively() {
    assert_that!(*LogLevel::parse_lenient("DEBUG"), eq(LevelFilter::Debug));
    assert_that!(*LogLevel::parse_lenient("warn"), eq(LevelFilter::Warn));
    assert_that!(*LogLevel::parse_lenient("off"), eq(LevelFilter::Off));
}

#[test]
fn given_unknown_level_when_parsed_then_defaults_to_info() {
    let level = LogLevel::from_str("verbose").unwrap();

    assert_that!(LevelFilter::from(level), eq(LevelFilter::Info));
}

#[test]
#[serial]
fn given_log_level_env_when_load_then_applied() {
    let (_temp, _guard) = setup_config_dir();
    let _level = EnvGuard::set("IDM_LOG_LEVEL", "trace");

    let config = Config::load().unwrap();

    assert_that!(*config.logging.level, eq(LevelFilter::Trace));
}
