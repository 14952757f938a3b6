use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "estoq", version, about = "Stock and shelf inventory client")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "API source (http(s) base URL or a local data directory)"
    )]
    pub api: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the session token and the selected stock
    Logout,
    /// Show session, stock, and draft state
    Status,
    Stock {
        #[command(subcommand)]
        command: StockCommands,
    },
    Shelf {
        #[command(subcommand)]
        command: ShelfCommands,
    },
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// The product form: draft fields, position selection, save
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum StockCommands {
    List,
    /// Make a stock the working context for shelf/product commands
    Select {
        id: i64,
    },
    Current,
    Clear,
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShelfCommands {
    List,
    /// Fetch a shelf layout and render its grid
    Grid {
        id: i64,
        #[arg(long, value_enum, default_value_t = GridMode::View)]
        mode: GridMode,
    },
    /// Inspect one cell: the product on it, or "empty cell"
    Cell {
        id: i64,
        row: u32,
        column: u32,
    },
    /// Commit an empty cell as the pending position selection
    Pick {
        id: i64,
        row: u32,
        column: u32,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rows: u32,
        #[arg(long)]
        columns: u32,
        #[arg(long)]
        destination_type: Option<String>,
        #[arg(long)]
        restrictions: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        columns: Option<u32>,
        #[arg(long)]
        destination_type: Option<String>,
        #[arg(long)]
        restrictions: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    List,
    Show {
        id: i64,
    },
    Update {
        id: i64,
        #[arg(long)]
        ean: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        lot_type: Option<String>,
        #[arg(long)]
        quantity_per_lot: Option<u32>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        expiry_date: Option<String>,
    },
    /// Set the stocked quantity
    Adjust {
        id: i64,
        quantity: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Search templates by name (at least two characters)
    Search { query: String },
    Show { ean: String },
    /// Prefill the draft from a template
    Apply { ean: String },
}

#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    Show,
    Set {
        #[arg(long)]
        ean: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        lot_type: Option<String>,
        #[arg(long)]
        quantity_per_lot: Option<u32>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        expiry_date: Option<String>,
        #[arg(long)]
        shelf: Option<i64>,
    },
    /// Render the chosen shelf's grid in select mode
    SelectPosition,
    /// Submit the draft as a new product
    Save,
    Clear {
        #[arg(long, help = "Drop only the selected position")]
        position: bool,
        #[arg(long, help = "Drop the shelf choice (and with it the position)")]
        shelf: bool,
    },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    View,
    Select,
}
