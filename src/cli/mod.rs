//! CLI module - Command-line shell for DigiPG
//!
//! Each subcommand stands in for one screen action and calls straight into the
//! session service.

mod commands;

use clap::{Args, Parser, Subcommand};

use crate::models::{PgDetails, PgLayout};

/// DigiPG - Paying-guest accommodation manager
#[derive(Parser)]
#[command(name = "digipg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    Init,

    /// Show the PG-ID the next registration will receive
    #[command(alias = "next")]
    NextId,

    /// Register a new account under the next PG-ID
    #[command(alias = "reg")]
    Register {
        password: String,
        confirm_password: String,
    },

    /// Log in and continue to detail capture or the dashboard
    Login { username: String, password: String },

    /// Save first-login PG details
    Details {
        username: String,
        #[command(flatten)]
        details: DetailsArgs,
    },

    /// Save the physical layout of a PG
    Layout {
        username: String,
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show rooms, occupancy and revenue
    #[command(alias = "dash")]
    Dashboard { username: String },

    /// Take one more bed
    Onboard { username: String },

    /// Free one bed
    Offboard { username: String },
}

#[derive(Args)]
pub struct DetailsArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub phone: String,
}

impl From<DetailsArgs> for PgDetails {
    fn from(args: DetailsArgs) -> Self {
        Self {
            pg_name: args.name,
            pg_address: args.address,
            pg_owner_name: args.owner,
            pg_phone_number: args.phone,
        }
    }
}

#[derive(Args)]
pub struct LayoutArgs {
    #[arg(long)]
    pub floors: u32,
    #[arg(long)]
    pub rooms: u32,
    #[arg(long)]
    pub beds: u32,
    #[arg(long)]
    pub cost: u64,
}

impl From<LayoutArgs> for PgLayout {
    fn from(args: LayoutArgs) -> Self {
        Self {
            num_floors: args.floors,
            num_rooms_per_floor: args.rooms,
            num_beds_per_room: args.beds,
            cost_per_bed: args.cost,
        }
    }
}

pub use commands::*;
