//! Domain command handlers.

use tabled::Tabled;

use cfops_core::{CloudFoundryOperations, Domain, DomainKind};

use crate::cli::{DomainsArgs, DomainsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Domain> for DomainRow {
    fn from(d: &Domain) -> Self {
        Self {
            name: d.name.clone(),
            status: match d.kind {
                DomainKind::Private => "owned".into(),
                DomainKind::Shared => "shared".into(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ops: &CloudFoundryOperations,
    args: DomainsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let domains = ops.domains();

    match args.command {
        DomainsCommand::List => {
            let all = domains.list().await?;
            let out = output::render_list(
                global.format(),
                &all,
                |d| DomainRow::from(d),
                |d| d.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Create {
            domain,
            organization,
        } => {
            let created = domains.create(&domain, &organization).await?;
            let out = output::render_single(
                global.format(),
                &created,
                |d| format!("Private domain {} created for {organization}", d.name),
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Share {
            domain,
            organization,
        } => {
            domains.share(&domain, &organization).await?;
            output::print_status(&format!("Shared {domain} with {organization}"), global.quiet);
            Ok(())
        }

        DomainsCommand::Unshare {
            domain,
            organization,
        } => {
            domains.unshare(&domain, &organization).await?;
            output::print_status(
                &format!("Unshared {domain} from {organization}"),
                global.quiet,
            );
            Ok(())
        }
    }
}
