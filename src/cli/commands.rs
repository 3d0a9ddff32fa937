use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    app::{identity_file, init_config},
    constants::KNOWN_LLMS,
    params::{ConfigFetcher, ConfigFormat, SsmParameterStore},
    runtime::{run_chat, ChatClient},
    utils::log_error,
    view::{Page, Renderer, Route},
};

use super::{Cli, Commands, Credentials};

/// Handle a CLI command. Returns `false` when the operation failed in a way
/// already shown to the user.
pub async fn handle_command(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration at: {}", path.display());
            Ok(true)
        }
        Commands::Models => {
            list_models();
            Ok(true)
        }
        command => {
            let client = ChatClient::load(cli.config.as_ref())?;
            run_with_client(&client, command).await
        }
    }
}

async fn run_with_client(client: &ChatClient, command: Commands) -> Result<bool> {
    match command {
        Commands::FetchConfig { format, output } => fetch_config(client, format, output).await,
        Commands::Login(creds) => {
            let manager = client.session_manager()?;
            let mut page = login_page(client, &creds);
            let ok = manager.sign_in(&mut page).await;
            Renderer::new().render(&page);
            if ok {
                println!("{} Signed in as {}", "OK".green(), creds.email);
            }
            Ok(ok)
        }
        Commands::Logout => {
            let manager = client.session_manager()?;
            let mut page = Page::new(client.model_selector(None));
            page.navigate(Route::Chat);
            let ok = manager.sign_out(&mut page).await;
            Renderer::new().render(&page);
            if ok {
                println!("Signed out.");
            }
            Ok(ok)
        }
        Commands::Register(creds) => {
            let manager = client.session_manager()?;
            let mut page = login_page(client, &creds);
            let ok = manager.register(&mut page).await;
            Renderer::new().render(&page);
            Ok(ok)
        }
        Commands::ResetPassword { email } => {
            let manager = client.session_manager()?;
            let mut page = Page::new(client.model_selector(None));
            page.email = email;
            let ok = manager.reset_password(&mut page).await;
            Renderer::new().render(&page);
            Ok(ok)
        }
        Commands::ChangePassword {
            credentials,
            new_password,
        } => {
            let manager = client.session_manager()?;
            let mut page = login_page(client, &credentials);
            let ok = manager.change_password(&mut page, &new_password).await;
            Renderer::new().render(&page);
            Ok(ok)
        }
        Commands::Send { message, llm } => {
            let relay = client.relay()?;
            let mut page = Page::new(client.model_selector(llm));
            page.navigate(Route::Chat);
            page.message = message;
            let outcome = relay.send(&mut page).await;
            Renderer::new().render(&page);
            Ok(outcome.is_delivered())
        }
        Commands::Chat { llm } => {
            run_chat(client, client.model_selector(llm)).await?;
            Ok(true)
        }
        Commands::Status => {
            show_status(client)?;
            Ok(true)
        }
        Commands::Init | Commands::Models => unreachable!("handled without a client"),
    }
}

fn login_page(client: &ChatClient, creds: &Credentials) -> Page {
    Page::new(client.model_selector(None)).with_credentials(&creds.email, &creds.password)
}

/// Fetch the Cognito ids and write the generated file
async fn fetch_config(client: &ChatClient, format: ConfigFormat, output: Option<PathBuf>) -> Result<bool> {
    let path = match (output, format) {
        (Some(path), _) => path,
        (None, ConfigFormat::Toml) => identity_file()?,
        (None, ConfigFormat::Js) => PathBuf::from("js/env.js"),
    };

    let aws = &client.config().aws;
    let store = SsmParameterStore::from_region(&aws.region).await;
    let fetcher = ConfigFetcher::new(Arc::new(store), aws.parameter_prefix.clone());

    match fetcher.fetch_to_file(&path, format).await {
        Ok(_) => {
            println!("{} {} updated with SSM parameters", "OK".green(), path.display());
            Ok(true)
        }
        Err(e) => {
            // Partial configuration is never written; fail the step
            log_error("config", &e);
            Err(e).with_context(|| format!("Failed to fetch parameters under {}", aws.parameter_prefix))
        }
    }
}

/// List known model selectors
pub fn list_models() {
    println!("Known models:");
    for model in KNOWN_LLMS {
        println!("  • {}", model.green());
    }
}

/// Show configuration and session status
fn show_status(client: &ChatClient) -> Result<()> {
    let config = client.config();
    println!("Chatbot status:");
    println!();
    println!("  Region:        {}", config.aws.region);
    println!("  Chat endpoint: {}", config.chat.endpoint);
    println!("  Default model: {}", config.chat.default_llm);

    match config.identity_settings() {
        Ok(settings) => {
            println!("  [OK] Identity: user pool {}", settings.user_pool_id);
            println!("       client {}", settings.client_id);
            println!("       identity pool {}", settings.identity_pool_id);
        }
        Err(e) => println!("  [WARNING] Identity: {}", e),
    }

    let signed_in = client
        .tokens()
        .get()
        .context("Failed to read session token")?
        .is_some_and(|t| !t.is_empty());
    if signed_in {
        println!("  [OK] Session: signed in");
    } else {
        println!("  [WARNING] Session: not signed in");
    }
    if let Some(path) = client.token_path() {
        println!("       token file {}", path.display());
    }

    println!();
    Ok(())
}
