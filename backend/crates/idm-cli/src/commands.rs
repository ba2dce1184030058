use clap::Subcommand;
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the first admin account (refused once an admin exists)
    BootstrapAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "IDM_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        full_name: Option<String>,
    },

    /// Self-register a regular user
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "IDM_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        full_name: Option<String>,
    },

    /// Create a user with any role (admin token required)
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "IDM_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long, value_parser = ["admin", "user"], default_value = "user")]
        role: String,
    },

    /// Exchange credentials for an access token
    Login {
        /// Username, or email if it contains '@'
        identifier: String,

        #[arg(long, env = "IDM_PASSWORD", hide_env_values = true)]
        password: String,

        /// Token lifetime in minutes (default: configured expiry)
        #[arg(long)]
        ttl_minutes: Option<i64>,
    },

    /// Show the user the token belongs to
    Whoami,

    /// List users (admin)
    ListUsers {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = idm_service::DEFAULT_LIST_LIMIT)]
        limit: u32,

        #[arg(long, value_parser = ["admin", "user"])]
        role: Option<String>,
    },

    /// Get a user by ID
    GetUser { id: Uuid },

    /// Update a user; only the given fields change
    UpdateUser {
        id: Uuid,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long, value_parser = ["admin", "user"])]
        role: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a user (admin)
    DeleteUser { id: Uuid },

    /// Change the token owner's password
    ChangePassword {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,
    },
}
