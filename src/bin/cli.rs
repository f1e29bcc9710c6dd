//! Address Book CLI Client
//!
//! Command-line interface for interacting with an address book server.

use addressbook::network::Client;
use addressbook::{Contact, ContactPatch};
use clap::{Parser, Subcommand};

/// Address Book CLI
#[derive(Parser, Debug)]
#[command(name = "addressbook-cli")]
#[command(about = "CLI for the address book server")]
struct Args {
    /// Server address
    #[arg(short, long, env = "ADDRESSBOOK_LISTEN_ADDR", default_value = "127.0.0.1:9090")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a contact
    Add {
        name: String,
        phone: String,
        address: String,
    },

    /// Find contacts by name or glob pattern (e.g. "j*")
    Find {
        /// Name pattern; empty or "*" matches everything
        #[arg(default_value = "*")]
        pattern: String,
    },

    /// Delete contacts by name or glob pattern
    Delete {
        /// Name pattern; "*" deletes everything
        pattern: String,
    },

    /// List all contacts
    List,

    /// Update a contact; omitted fields keep their value
    Update {
        /// Current name of the contact
        name: String,

        #[arg(long, default_value = "")]
        new_name: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: cannot connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Commands::Add { name, phone, address } => {
            client.add_contact(&name, &phone, &address).map(|msg| println!("{}", msg))
        }
        Commands::Find { pattern } => client.find_contacts(&pattern).map(|c| print_contacts(&c)),
        Commands::Delete { pattern } => {
            client.delete_contacts(&pattern).map(|msg| println!("{}", msg))
        }
        Commands::List => client.list_contacts().map(|c| print_contacts(&c)),
        Commands::Update {
            name,
            new_name,
            phone,
            address,
        } => client
            .update_contact(&name, ContactPatch::new(&new_name, &phone, &address))
            .map(|(msg, contact)| {
                println!("{}", msg);
                print_contacts(&[contact]);
            }),
        Commands::Ping => client.ping().map(|_| println!("PONG")),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn print_contacts(contacts: &[Contact]) {
    for c in contacts {
        println!("{}\t{}\t{}", c.name, c.phone, c.address);
    }
}
