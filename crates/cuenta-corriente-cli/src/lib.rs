mod config;
mod exportar;
mod registrar;
mod saldo;

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, CommandFactory as _, Parser, Subcommand, ValueEnum};
use cuenta_corriente::directory::MemberQuery;
use cuenta_corriente::model::Category;
use cuenta_corriente::{Decimal, Session, roster};

use config::Sources;

#[derive(Parser)]
#[command(
    name = "cuentas",
    about = "Cuenta corriente de afiliados: saldos, movimientos y exportación"
)]
#[command(disable_help_subcommand = true)]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(ClapArgs)]
struct SourceArgs {
    /// Roster file with afiliados and seed movements
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Apps Script endpoint of the remote movement log
    #[arg(long)]
    script_url: Option<String>,
}

#[derive(ClapArgs)]
struct MemberArgs {
    /// Member DNI
    #[arg(long, conflicts_with = "legajo")]
    dni: Option<u64>,

    /// Member file number
    #[arg(long)]
    legajo: Option<String>,
}

impl MemberArgs {
    fn query(self) -> Result<MemberQuery> {
        match (self.dni, self.legajo) {
            (Some(dni), None) => Ok(MemberQuery::Dni(dni)),
            (None, Some(legajo)) => Ok(MemberQuery::Legajo(legajo)),
            _ => bail!("indique --dni o --legajo"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TipoArg {
    Orden,
    Prestacion,
    Varios,
}

impl From<TipoArg> for Category {
    fn from(tipo: TipoArg) -> Category {
        match tipo {
            TipoArg::Orden => Category::Order,
            TipoArg::Prestacion => Category::Service,
            TipoArg::Varios => Category::Misc,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the JSON API server for the operator UI (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8452")]
        port: u16,
    },
    /// Print one member's balance and movements, then exit
    Saldo {
        #[command(flatten)]
        member: MemberArgs,
    },
    /// Record a new movement against one member
    Registrar {
        #[command(flatten)]
        member: MemberArgs,

        /// Movement type
        #[arg(long, value_enum)]
        tipo: TipoArg,

        /// Total agreed amount
        #[arg(long)]
        monto: Decimal,

        /// Installment count, prestaciones only
        #[arg(long, default_value = "1")]
        cuotas: u32,

        /// Movement date, today when omitted
        #[arg(long)]
        fecha: Option<NaiveDate>,

        /// Description, defaults to "{Tipo} - {fecha}"
        #[arg(long)]
        descripcion: Option<String>,
    },
    /// Write the CSV export of one member's recorded movements
    Exportar {
        #[command(flatten)]
        member: MemberArgs,

        /// Output file, defaults to the historical download name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(args: impl IntoIterator<Item = String>) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    clap_complete::CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse_from(args);
    let sources = Sources::resolve(args.source.base, args.source.script_url)?;

    let command = args.command.unwrap_or(Commands::Serve {
        port: cuenta_corriente_web::DEFAULT_PORT,
    });
    match command {
        Commands::Serve { port } => {
            cuenta_corriente_web::run(&sources.roster, &sources.script_url, port).await
        }
        Commands::Saldo { member } => saldo::show_saldo(&sources, &member.query()?).await,
        Commands::Registrar {
            member,
            tipo,
            monto,
            cuotas,
            fecha,
            descripcion,
        } => {
            registrar::record(
                &sources,
                &member.query()?,
                tipo.into(),
                monto,
                cuotas,
                fecha,
                descripcion,
            )
            .await
        }
        Commands::Exportar { member, output } => {
            exportar::write_csv(&sources, &member.query()?, output)
        }
    }
}

/// Build the session from the roster file. A broken roster degrades to an
/// empty one; lookups then miss and say so.
fn load_session(sources: &Sources) -> Session {
    let roster = match roster::load_roster(&sources.roster) {
        Ok(roster) => roster,
        Err(err) => {
            tracing::warn!("starting with an empty roster: {err:#}");
            Default::default()
        }
    };
    Session::new(roster)
}
