use crate::models::PgDetails;
use crate::state::SharedState;

use super::command_error;

pub async fn cmd_save_details(
    state: &SharedState,
    username: &str,
    details: PgDetails,
) -> anyhow::Result<()> {
    match state.session().save_details(username, details).await {
        Ok(_) => {
            println!("✓ Details saved for {username}");
            super::cmd_dashboard(state, username).await
        }
        Err(e) => Err(command_error(e)),
    }
}
