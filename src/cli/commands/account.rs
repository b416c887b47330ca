//! Registration and login command handlers

use crate::services::FlowState;
use crate::state::SharedState;

use super::command_error;

pub async fn cmd_next_username(state: &SharedState) -> anyhow::Result<()> {
    match state.session().preview_username().await {
        Ok(username) => println!("Next PG-ID: {username}"),
        Err(e) => return Err(command_error(e)),
    }
    Ok(())
}

pub async fn cmd_register(
    state: &SharedState,
    password: &str,
    confirm_password: &str,
) -> anyhow::Result<()> {
    match state.session().register(password, confirm_password).await {
        Ok(receipt) => {
            println!("✓ {} - Registration successful", receipt.username);
            println!("  Next PG-ID: {}", receipt.next_username);
        }
        Err(e) => return Err(command_error(e)),
    }
    Ok(())
}

pub async fn cmd_login(state: &SharedState, username: &str, password: &str) -> anyhow::Result<()> {
    let outcome = match state.session().login(username, password).await {
        Ok(outcome) => outcome,
        Err(e) => return Err(command_error(e)),
    };

    match outcome.next {
        FlowState::AwaitingDetails => {
            println!("Welcome {}. Please complete your PG details:", outcome.username);
            println!(
                "  digipg details {} --name <name> --address <address> --owner <owner> --phone <phone>",
                outcome.username
            );
        }
        FlowState::Dashboard => {
            println!("Welcome back {}.", outcome.username);
            super::cmd_dashboard(state, &outcome.username).await?;
        }
        FlowState::Login => {}
    }

    Ok(())
}
