//! Dashboard and occupancy command handlers

use crate::models::OccupancyUpdate;
use crate::services::SessionError;
use crate::state::SharedState;

use super::command_error;

pub async fn cmd_dashboard(state: &SharedState, username: &str) -> anyhow::Result<()> {
    let view = match state.session().load_dashboard(username).await {
        Ok(view) => view,
        Err(e) => return Err(command_error(e)),
    };

    println!("Dashboard: {}", view.username);
    println!("{:-<50}", "");

    let details = &view.details;
    println!("  PG Name:      {}", details.pg_name);
    println!("  Address:      {}", details.pg_address);
    println!("  Owner:        {}", details.pg_owner_name);
    println!("  Phone:        {}", details.pg_phone_number);
    println!("{:-<50}", "");

    let property = &view.property;
    if property.layout.is_none() {
        println!("  No layout yet. Add one with: digipg layout {username} ...");
    }
    println!("  Number of Rooms:   {}", property.metrics.number_of_rooms);
    println!("  Max Occupancy:     {}", property.metrics.max_occupancy);
    println!("  Max Revenue:       {}", property.metrics.max_revenue);
    println!("  Current Occupancy: {}", property.current_occupancy);
    println!("  Current Revenue:   {}", property.current_monthly_revenue);

    Ok(())
}

pub async fn cmd_onboard(state: &SharedState, username: &str) -> anyhow::Result<()> {
    print_update(state.session().onboard(username).await)
}

pub async fn cmd_offboard(state: &SharedState, username: &str) -> anyhow::Result<()> {
    print_update(state.session().offboard(username).await)
}

fn print_update(result: Result<OccupancyUpdate, SessionError>) -> anyhow::Result<()> {
    match result {
        Ok(update) => {
            // Rejections are silent apart from the unchanged count.
            println!("Current Occupancy: {}", update.occupancy);
            Ok(())
        }
        Err(e) => Err(command_error(e)),
    }
}
