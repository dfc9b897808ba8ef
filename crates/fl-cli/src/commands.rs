use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a user from a JSON attribute file and print its record
    Record {
        /// Path to a JSON object of user attributes
        #[arg(long)]
        user: PathBuf,

        /// Keep private attribute values (cache layout)
        #[arg(long)]
        include_private: bool,

        /// Include the user's flag snapshot under `config`
        #[arg(long)]
        include_flags: bool,
    },

    /// Rewrite a cached user record in the current layout
    Migrate {
        /// Path to a cached user record (either layout)
        #[arg(long)]
        input: PathBuf,
    },

    /// Print this install's anonymous user key, creating it if needed
    AnonymousKey,

    /// User cache operations
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List cached users, most recently updated first
    List,
}
