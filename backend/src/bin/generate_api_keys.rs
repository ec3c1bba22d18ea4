//! Offline API key provisioning utility
//!
//! Run once before deploying:
//!
//! ```text
//! cargo run --bin generate-api-keys
//! ```
//!
//! Prints one high-entropy key per known service identity, the matching
//! `.env` lines, and the INSERT statements for the api_clients table. The
//! utility never touches the database itself and never runs in the serving
//! path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Services that authenticate against the barrier API.
const SERVICES: [&str; 3] = ["ingestion-valencia", "alert-dispatcher", "dashboard"];

/// Generate a 256-bit urlsafe API key.
fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn main() {
    let keys: Vec<(&str, String)> = SERVICES
        .iter()
        .map(|service| (*service, generate_api_key()))
        .collect();

    println!("Generated API keys");
    println!("==================");
    for (service, key) in &keys {
        println!("  {service}: {key}");
    }

    println!();
    println!("# Copy into .env (keep .env out of version control):");
    for (service, key) in &keys {
        let env_var = format!("{}_API_KEY", service.to_uppercase().replace('-', "_"));
        println!("{env_var}={key}");
    }

    println!();
    println!("-- Insert into the credential table:");
    for (service, key) in &keys {
        println!(
            "INSERT INTO api_clients (service_name, api_key) VALUES ('{service}', '{key}') \
             ON CONFLICT (service_name) DO NOTHING;"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_length_and_charset() {
        let key = generate_api_key();
        // 32 bytes -> 43 base64url chars, no padding
        assert_eq!(key.len(), 43);
        assert!(key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
    }
}
