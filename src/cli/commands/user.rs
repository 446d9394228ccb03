//! User management command handlers

use crate::config::Config;
use crate::db::Store;
use crate::db::repositories::user::generate_password;

pub async fn cmd_user_add(
    config: &Config,
    username: &str,
    password: Option<&str>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username(username).await?.is_some() {
        anyhow::bail!("User '{username}' already exists");
    }

    let generated = password.is_none();
    let password = match password {
        Some(p) => p.to_string(),
        None => generate_password(),
    };

    let user = store.create_user(username, &password).await?;

    println!("User '{}' created.", user.username);
    if generated {
        println!("  Password: {password}");
    }
    println!("  API key:  {}", user.api_key);

    Ok(())
}
