use clap::Subcommand;
use serde_json::json;
use studyloop_core::{Database, RewardLedger};

#[derive(Subcommand)]
pub enum XpAction {
    /// Print the XP total
    Show,
    /// Add XP to the total
    Add {
        /// Points to add
        amount: u32,
    },
    /// Set the XP total back to zero
    Reset,
}

pub fn run(action: XpAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = RewardLedger::open(Database::open()?);

    match action {
        XpAction::Show => {
            println!("{}", json!({ "total_xp": ledger.total_xp() }));
        }
        XpAction::Add { amount } => {
            let total = ledger.add_xp(amount)?;
            println!("{}", json!({ "total_xp": total }));
        }
        XpAction::Reset => {
            ledger.reset()?;
            println!("xp reset to 0");
        }
    }
    Ok(())
}
