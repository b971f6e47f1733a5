//! IoT Crypto CLI — `iotc` command.
//!
//! Exposes key generation, signing, key agreement and frame encryption
//! over hex strings, one subcommand per operation.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use iot_crypto::{
    agree, decrypt, derive_public_key, encrypt, sign, validate_public_key, verify, KeyPair,
};

// ── Input helpers ─────────────────────────────────────────────────────────────

/// Resolve a text-or-file argument pair into bytes.
fn read_input(text: Option<String>, file: Option<&Path>, what: &str) -> Result<Vec<u8>> {
    match (text, file) {
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(path)) => std::fs::read(path)
            .with_context(|| format!("failed to read {what} from {}", path.display())),
        (None, None) => Err(anyhow!("missing {what}: pass --{what} or --{what}-file")),
        (Some(_), Some(_)) => Err(anyhow!("pass either --{what} or --{what}-file, not both")),
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// IoT Crypto CLI — P-256 keys, ECDSA signatures, ECDH and AES-128-CCM frames.
#[derive(Parser, Debug)]
#[command(
    name = "iotc",
    about = "IoT Crypto CLI",
    version,
    long_about = "iotc — IoT Crypto CLI\n\nGenerate P-256 key pairs, sign and verify messages, derive ECDH\nshared secrets, and encrypt or decrypt AES-128-CCM frames.\nAll keys, signatures and frames are lowercase hex."
)]
struct Cli {
    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new key pair
    Keygen,

    /// Derive the public key for a private key
    Pubkey {
        /// Private key (64 hex chars)
        #[arg(long, env = "IOTC_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },

    /// Sign a message
    Sign {
        /// Private key (64 hex chars)
        #[arg(long, env = "IOTC_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Message text
        #[arg(long)]
        message: Option<String>,

        /// Read the message bytes from a file
        #[arg(long)]
        message_file: Option<PathBuf>,
    },

    /// Verify a signature (exits non-zero when invalid)
    Verify {
        /// DER signature (hex)
        #[arg(long)]
        signature: String,

        /// Public key (130 hex chars, or compressed 66)
        #[arg(long)]
        public_key: String,

        /// Message text
        #[arg(long)]
        message: Option<String>,

        /// Read the message bytes from a file
        #[arg(long)]
        message_file: Option<PathBuf>,
    },

    /// Derive an ECDH shared secret with a peer
    Agree {
        /// Own private key (64 hex chars)
        #[arg(long, env = "IOTC_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Peer public key
        #[arg(long)]
        peer_public_key: String,
    },

    /// Encrypt into a nonce ‖ ciphertext ‖ tag frame
    Encrypt {
        /// Key material, usually a shared secret from `agree`
        #[arg(long, env = "IOTC_KEY", hide_env_values = true)]
        key: String,

        /// Plaintext
        #[arg(long)]
        plaintext: Option<String>,

        /// Read the plaintext bytes from a file
        #[arg(long)]
        plaintext_file: Option<PathBuf>,
    },

    /// Decrypt a frame produced by `encrypt`
    Decrypt {
        /// Key material used for encryption
        #[arg(long, env = "IOTC_KEY", hide_env_values = true)]
        key: String,

        /// Encrypted frame (hex)
        #[arg(long)]
        payload: String,

        /// Write the raw plaintext to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let json = cli.json;
    let result = match cli.command {
        Commands::Keygen => cmd_keygen(json),
        Commands::Pubkey { private_key } => cmd_pubkey(&private_key, json),
        Commands::Sign {
            private_key,
            message,
            message_file,
        } => read_input(message, message_file.as_deref(), "message")
            .and_then(|message| cmd_sign(&private_key, &message, json)),
        Commands::Verify {
            signature,
            public_key,
            message,
            message_file,
        } => read_input(message, message_file.as_deref(), "message")
            .and_then(|message| cmd_verify(&signature, &message, &public_key, json)),
        Commands::Agree {
            private_key,
            peer_public_key,
        } => cmd_agree(&private_key, &peer_public_key, json),
        Commands::Encrypt {
            key,
            plaintext,
            plaintext_file,
        } => read_input(plaintext, plaintext_file.as_deref(), "plaintext")
            .and_then(|plaintext| cmd_encrypt(&key, &plaintext, json)),
        Commands::Decrypt {
            key,
            payload,
            output,
        } => cmd_decrypt(&key, &payload, output.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `iotc keygen`
fn cmd_keygen(json: bool) -> Result<()> {
    let pair = KeyPair::generate().context("failed to generate key pair")?;
    if json {
        let out = serde_json::to_string_pretty(&pair.to_hex_pair())
            .context("failed to serialize key pair")?;
        println!("{out}");
    } else {
        println!("Private Key: {}", pair.private_key_hex());
        println!("Public Key:  {}", pair.public_key_hex());
    }
    Ok(())
}

/// `iotc pubkey --private-key HEX`
fn cmd_pubkey(private_key: &str, json: bool) -> Result<()> {
    let public_key = derive_public_key(private_key).context("failed to derive public key")?;
    if json {
        print_json(&json!({ "public_key": public_key }))
    } else {
        println!("{public_key}");
        Ok(())
    }
}

/// `iotc sign --private-key HEX --message TEXT`
fn cmd_sign(private_key: &str, message: &[u8], json: bool) -> Result<()> {
    let signature = sign(message, private_key).context("failed to sign message")?;
    if json {
        print_json(&json!({ "signature": signature }))
    } else {
        println!("{signature}");
        Ok(())
    }
}

/// `iotc verify --signature HEX --public-key HEX --message TEXT`
fn cmd_verify(signature: &str, message: &[u8], public_key: &str, json: bool) -> Result<()> {
    // A bad key is a usage error, not an invalid signature.
    validate_public_key(public_key).context("invalid --public-key")?;

    let valid = verify(signature, message, public_key);
    if json {
        print_json(&json!({ "valid": valid }))?;
    } else {
        println!("Signature Valid: {}", if valid { "Yes" } else { "No" });
    }
    if valid {
        Ok(())
    } else {
        Err(anyhow!("signature verification failed"))
    }
}

/// `iotc agree --private-key HEX --peer-public-key HEX`
fn cmd_agree(private_key: &str, peer_public_key: &str, json: bool) -> Result<()> {
    let shared = agree(private_key, peer_public_key).context("key agreement failed")?;
    if json {
        print_json(&json!({ "shared_secret": shared }))
    } else {
        println!("{shared}");
        Ok(())
    }
}

/// `iotc encrypt --key HEX --plaintext TEXT`
fn cmd_encrypt(key: &str, plaintext: &[u8], json: bool) -> Result<()> {
    let encrypted = encrypt(key, plaintext).context("encryption failed")?;
    if json {
        print_json(&json!({ "encrypted": encrypted }))
    } else {
        println!("{encrypted}");
        Ok(())
    }
}

/// `iotc decrypt --key HEX --payload HEX [--output PATH]`
fn cmd_decrypt(key: &str, payload: &str, output: Option<&Path>, json: bool) -> Result<()> {
    let plaintext = decrypt(key, payload).context("decryption failed")?;

    if let Some(path) = output {
        std::fs::write(path, &plaintext)
            .with_context(|| format!("failed to write plaintext to {}", path.display()))?;
        log::debug!("wrote {} bytes to {}", plaintext.len(), path.display());
        return Ok(());
    }

    let text = String::from_utf8(plaintext)
        .map_err(|_| anyhow!("plaintext is not UTF-8; use --output to write raw bytes"))?;
    if json {
        print_json(&json!({ "plaintext": text }))
    } else {
        println!("{text}");
        Ok(())
    }
}
