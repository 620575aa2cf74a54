use nex_impact::{
    connect_to_blockchain, ImpactLedger, LedgerConfig, Network, RewardType, WalletSummary,
};
use serde::Serialize;
use std::error::Error;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = LedgerConfig::from_env()?;
    info!(?config, "starting impact ledger");
    let ledger = Arc::new(ImpactLedger::new(config));

    println!("🌱 NexImpact Ledger v0.1 Starting...");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n🌍 Options:");
        println!("1.  Record Impact");
        println!("2.  View Transactions");
        println!("3.  View Impact Points");
        println!("4.  Redeem Points");
        println!("5.  Verify Transaction");
        println!("6.  Confirm Transaction");
        println!("7.  Connect to Network");
        println!("8.  Wallet Summary");
        println!("9.  View Ledger");
        println!("10. Exit");

        select! {
            line = stdin.next_line() => {
                let choice = match line {
                    Ok(Some(line_str)) => line_str,
                    Ok(None) | Err(_) => "10".to_string(),
                };
                let choice = choice.trim();
                if choice == "10" || choice == "exit" {
                    break;
                }
                if let Err(e) = run_choice(&ledger, choice, &mut stdin).await {
                    if is_interrupt(e.as_ref()) {
                        println!();
                        break;
                    }
                    println!("❌ {}", e);
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    let cancelled = ledger.shutdown();
    info!(cancelled, "impact ledger stopped");
    Ok(())
}

async fn run_choice(
    ledger: &ImpactLedger,
    choice: &str,
    stdin: &mut Input,
) -> Result<(), Box<dyn Error>> {
    match choice {
        "1" => {
            let user = prompt(stdin, "User ID:").await?;
            let task = prompt(stdin, "Task ID:").await?;
            let project = prompt(stdin, "Project ID:").await?;
            let points: i64 = prompt(stdin, "Points:").await?.parse()?;
            let tx = ledger.record_impact(&user, &task, &project, points)?;
            if tx.verified {
                println!("✅ Recorded:");
            } else {
                println!("⏳ Recorded (confirmation pending):");
            }
            show(&tx)?;
        }
        "2" => {
            let user = prompt(stdin, "User ID:").await?;
            let transactions = ledger.get_user_transactions(&user)?;
            if transactions.is_empty() {
                println!("No transactions for {}.", user);
            } else {
                show(&transactions)?;
            }
        }
        "3" => {
            let user = prompt(stdin, "User ID:").await?;
            println!("⭐ {} impact points", ledger.get_user_impact_points(&user)?);
        }
        "4" => {
            let user = prompt(stdin, "User ID:").await?;
            let points: u64 = prompt(stdin, "Points to redeem:").await?.parse()?;
            let reward: RewardType = prompt(stdin, "Reward (donation / certification / cash):")
                .await?
                .parse()?;
            show(&ledger.redeem_points(&user, points, reward)?)?;
        }
        "5" => {
            let hash = prompt(stdin, "Transaction hash:").await?;
            if ledger.verify_transaction(&hash)? {
                println!("✅ Verified.");
            } else {
                println!("⏳ Not verified (unknown or pending).");
            }
        }
        "6" => {
            let id = prompt(stdin, "Transaction ID:").await?;
            if ledger.confirm_transaction(&id)? {
                println!("✅ Confirmed.");
            } else {
                println!("❌ Transaction not found.");
            }
        }
        "7" => {
            let network: Network = prompt(stdin, "Network (polygon / solana / ethereum):")
                .await?
                .parse()?;
            show(&connect_to_blockchain(network))?;
        }
        "8" => {
            let user = prompt(stdin, "User ID:").await?;
            show(&WalletSummary::for_user(ledger, &user)?)?;
        }
        "9" => show(&ledger.transactions()?)?,
        _ => println!("❌ Invalid choice."),
    }
    Ok(())
}

// Ctrl-C while waiting for input surfaces as an `Interrupted` error.
async fn prompt(stdin: &mut Input, label: &str) -> Result<String, Box<dyn Error>> {
    println!("{}", label);
    select! {
        line = stdin.next_line() => Ok(line?.unwrap_or_default().trim().to_string()),
        _ = tokio::signal::ctrl_c() => {
            let interrupted: Box<dyn Error> =
                Box::new(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
            Err(interrupted)
        }
    }
}

fn is_interrupt(e: &(dyn Error + 'static)) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
}

fn show<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
