//! Layout editor command handler

use crate::models::PgLayout;
use crate::state::SharedState;

use super::command_error;

pub async fn cmd_save_layout(
    state: &SharedState,
    username: &str,
    layout: PgLayout,
) -> anyhow::Result<()> {
    if let Err(e) = state.session().save_layout(username, &layout).await {
        return Err(command_error(e));
    }

    println!(
        "✓ Layout saved: {} floor(s) x {} room(s) x {} bed(s) at {} per bed",
        layout.num_floors, layout.num_rooms_per_floor, layout.num_beds_per_room, layout.cost_per_bed
    );
    Ok(())
}
