//! Interactive login against a three-guard admission chain.
//!
//! The chain throttles to two attempts per minute across all users, checks
//! the credential, then lets the administrator through the role fast path.
//! The prompt repeats until an attempt is admitted.
//!
//! Run with: `cargo run --example login_console`
//! Set `RUST_LOG=admission_core=debug` to watch each guard decide.

use admission_core::{
    Chain, CredentialGuard, Error, Gateway, InMemoryDirectory, RateLimiter, RoleGuard,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const ADMIN: &str = "admin@example.com";

fn build_gateway() -> Result<Gateway, Error> {
    let directory = Arc::new(
        InMemoryDirectory::new()
            .with_identity(ADMIN, "admin_pass")
            .with_identity("user@example.com", "user_pass"),
    );

    // Every user shares the same two attempts per minute.
    let chain = Chain::builder()
        .guard(RateLimiter::new(2, Duration::from_secs(60))?)
        .guard(CredentialGuard::new(directory))
        .guard(RoleGuard::for_identity(ADMIN)?)
        .build()?;

    Ok(Gateway::with_chain(chain))
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> io::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;
    lines.next().transpose()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let gateway = build_gateway()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(identity) = prompt(&mut lines, "Enter email")? else {
            break;
        };
        let Some(password) = prompt(&mut lines, "Input password")? else {
            break;
        };

        let verdict = gateway.admit(identity.trim(), password.trim());
        if verdict.admitted {
            if verdict.final_grant {
                println!("Hello, admin!");
            } else {
                println!("Hello, user!");
            }
            println!("Authorization has been successful!");
            break;
        }
        println!("Access denied: {}", verdict.reason);
    }

    Ok(())
}
