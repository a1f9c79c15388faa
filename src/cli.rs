use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "farmbook")]
#[command(about = "Local-first farm bookkeeping", long_about = None)]
pub struct Cli {
    /// Override Farmbook home directory (config/data subdirs will be created inside it).
    #[arg(long, env = "FARMBOOK_HOME")]
    pub home: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Login(LoginArgs),
    Farm(FarmArgs),

    Tx(TxArgs),
    Category(CategoryArgs),
    Account(AccountArgs),
    Liability(LiabilityArgs),
    Animal(AnimalArgs),
    Inventory(InventoryArgs),
    Asset(AssetArgs),

    Dashboard(DashboardArgs),
    Upcoming(UpcomingArgs),
    Search(SearchArgs),

    Sync(SyncArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email the cloud state is keyed on (case-insensitive).
    pub email: String,

    /// Category suggestion endpoint to remember.
    #[arg(long)]
    pub suggest_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum FarmCmd {
    Rename { name: String },
}

#[derive(Debug, Args)]
pub struct FarmArgs {
    #[command(subcommand)]
    pub cmd: FarmCmd,
}

#[derive(Debug, Subcommand)]
pub enum TxCmd {
    Add {
        /// "income" or "expense".
        kind: String,
        amount: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        account: String,

        #[arg(long, short = 'm', alias = "note")]
        desc: Option<String>,

        /// Transaction date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    List,
}

#[derive(Debug, Args)]
pub struct TxArgs {
    #[command(subcommand)]
    pub cmd: TxCmd,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCmd {
    Add {
        name: String,

        /// "income" or "expense".
        #[arg(long = "type")]
        kind: String,

        /// Hex color; picked from the default palette when omitted.
        #[arg(long)]
        color: Option<String>,
    },
    List,
    Rm {
        name: String,
    },
    /// Ask the external classifier which category fits a description.
    Suggest {
        description: String,
    },
}

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub cmd: CategoryCmd,
}

#[derive(Debug, Subcommand)]
pub enum AccountCmd {
    Add {
        name: String,

        /// "standard" or "credit".
        #[arg(long = "type")]
        kind: String,

        /// Opening balance; for credit accounts this is the amount owed.
        #[arg(long)]
        balance: Option<String>,

        /// Day of month (1-31) a credit account's payment is due.
        #[arg(long)]
        payment_day: Option<u32>,
    },
    List,
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub cmd: AccountCmd,
}

#[derive(Debug, Subcommand)]
pub enum LiabilityCmd {
    Add {
        name: String,
        balance: String,

        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        installment: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    List,
}

#[derive(Debug, Args)]
pub struct LiabilityArgs {
    #[command(subcommand)]
    pub cmd: LiabilityCmd,
}

#[derive(Debug, Subcommand)]
pub enum AnimalCmd {
    Add {
        name: String,

        #[arg(long)]
        breed: Option<String>,

        #[arg(long)]
        tag: Option<String>,
    },
    Log {
        species: String,
        kind: String,

        #[arg(long)]
        note: Option<String>,

        /// Log date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    List,
}

#[derive(Debug, Args)]
pub struct AnimalArgs {
    #[command(subcommand)]
    pub cmd: AnimalCmd,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCmd {
    Add {
        name: String,
        quantity: String,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long, short = 'm')]
        desc: Option<String>,
    },
    List,
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub cmd: InventoryCmd,
}

#[derive(Debug, Subcommand)]
pub enum AssetCmd {
    Add {
        name: String,
        value: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, short = 'm')]
        desc: Option<String>,

        /// Purchase date (YYYY-MM-DD).
        #[arg(long)]
        purchased: Option<String>,
    },
    List,
}

#[derive(Debug, Args)]
pub struct AssetArgs {
    #[command(subcommand)]
    pub cmd: AssetCmd,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Clock override for due-date math (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpcomingArgs {
    /// Clock override for due-date math (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
}

#[derive(Debug, Subcommand)]
pub enum SyncCmd {
    Push,
    Pull,
    Status,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub cmd: SyncCmd,
}
