use crate::commands::{CacheCommands, Commands};
use crate::{CliError, CliResult};

use fl_config::Config;
use fl_core::{
    Environment, FlagSource, FlagStore, InstallEnvironment, PrivacyPolicy, RecordOptions, User,
    UserAttribute, UserAttributes, load_cached_user,
};
use fl_storage::{FileKeyValueStore, UserCache};

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::{Value, json};

/// Everything a command needs, resolved once from configuration.
pub struct Context {
    pub policy: PrivacyPolicy,
    pub env: InstallEnvironment<FileKeyValueStore>,
    pub cache: Option<UserCache>,
}

impl Context {
    pub fn from_config(config: &Config) -> CliResult<Self> {
        let cache_dir = config.cache_dir()?;
        if !config.cache.is_enabled() {
            info!("User cache disabled (cache.max_cached_users = 0)");
        }
        Ok(Self::new(
            config.privacy_policy(),
            &cache_dir,
            config.cache.max_cached_users,
        ))
    }

    /// Settings and users both live under `cache_dir`. A limit of zero
    /// disables the user cache.
    pub fn new(policy: PrivacyPolicy, cache_dir: &Path, max_cached_users: usize) -> Self {
        let env = InstallEnvironment::new(
            FileKeyValueStore::new(cache_dir),
            std::env::consts::ARCH,
            std::env::consts::OS,
        );
        let cache = (max_cached_users > 0).then(|| UserCache::new(cache_dir, max_cached_users));

        Self { policy, env, cache }
    }
}

/// Runs `command` and returns its JSON output.
pub fn execute(command: Commands, context: &Context) -> CliResult<Value> {
    match command {
        Commands::Record {
            user,
            include_private,
            include_flags,
        } => record(context, &user, include_private, include_flags),
        Commands::Migrate { input } => migrate(context, &input),
        Commands::AnonymousKey => Ok(json!({ "anonymousKey": context.env.default_key() })),
        Commands::Cache { action } => match action {
            CacheCommands::List => list_cache(context),
        },
    }
}

fn record(
    context: &Context,
    path: &Path,
    include_private: bool,
    include_flags: bool,
) -> CliResult<Value> {
    let input = read_json(path)?;
    let user = user_from_input(&input, &context.env)?;

    if let Some(cache) = &context.cache
        && let Err(e) = cache.store_user(&user, &context.env)
    {
        warn!("Could not cache user: {e} ({})", e.recovery_hint());
    }

    let options = RecordOptions {
        include_flags,
        include_private_values: include_private,
    };
    Ok(Value::Object(user.to_record(&context.policy, options)))
}

fn migrate(context: &Context, path: &Path) -> CliResult<Value> {
    let input = read_json(path)?;
    let user = load_cached_user(&input, &context.env)
        .ok_or_else(|| CliError::invalid_input("cached record must be a JSON object"))?;

    info!("Migrated cached record for user {}", user.key);
    Ok(Value::Object(
        user.to_record(&PrivacyPolicy::default(), RecordOptions::CACHE),
    ))
}

fn list_cache(context: &Context) -> CliResult<Value> {
    let Some(cache) = &context.cache else {
        return Ok(Value::Array(Vec::new()));
    };

    let loaded = cache.load(&context.env)?;
    if let Some(message) = loaded.corruption_error {
        return Err(CliError::invalid_input(format!(
            "user cache at {} is corrupted: {message}",
            cache.path().display()
        )));
    }

    let entries = loaded
        .users
        .iter()
        .map(|user| {
            json!({
                "key": user.key,
                "anonymous": user.is_anonymous,
                "updatedAt": fl_core::format_timestamp(&user.last_updated),
                "flags": user.flags().current_flags().len(),
            })
        })
        .collect();
    Ok(Value::Array(entries))
}

fn read_json(path: &Path) -> CliResult<Value> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CliError::io(PathBuf::from(path), e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Builds a user from a JSON attribute object in record layout.
///
/// Defaults are applied as for a freshly constructed user, so a missing key
/// becomes the install's anonymous key. Flags under `config`, bare or as
/// full flag objects, become the user's evaluated flags.
pub(crate) fn user_from_input(input: &Value, env: &dyn Environment) -> CliResult<User> {
    let Some(map) = input.as_object() else {
        return Err(CliError::invalid_input("user file must hold a JSON object"));
    };
    let parsed = User::from_record(input, env)
        .ok_or_else(|| CliError::invalid_input("user file must hold a JSON object"))?;

    let attributes = UserAttributes {
        key: map
            .get(UserAttribute::Key.as_str())
            .and_then(Value::as_str)
            .map(String::from),
        name: parsed.name,
        first_name: parsed.first_name,
        last_name: parsed.last_name,
        country: parsed.country,
        ip_address: parsed.ip_address,
        email: parsed.email,
        avatar: parsed.avatar,
        custom: parsed.custom,
        is_anonymous: map
            .get(UserAttribute::Anonymous.as_str())
            .and_then(Value::as_bool),
        device: parsed.device,
        operating_system: parsed.operating_system,
        private_attributes: parsed.private_attributes,
    };

    let mut user = User::new(attributes, env);
    if let Some(raw) = map.get("config").and_then(Value::as_object) {
        user.replace_flag_store(FlagStore::new(raw, FlagSource::Evaluation));
    }
    Ok(user)
}
