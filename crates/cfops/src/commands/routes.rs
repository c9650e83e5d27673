//! Route command handlers.

use futures_util::TryStreamExt;
use serde::Serialize;
use tabled::Tabled;

use cfops_core::{CloudFoundryOperations, Level, Route, RouteSummary};

use crate::cli::{GlobalOpts, RouteSpec, RoutesArgs, RoutesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Space")]
    space: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Application")]
    application: String,
}

impl From<&RouteSummary> for RouteRow {
    fn from(r: &RouteSummary) -> Self {
        Self {
            space: r.space.clone(),
            host: output::or_dash(r.host.as_deref()),
            domain: r.domain.clone(),
            path: output::or_dash(r.path.as_deref()),
            application: output::or_dash(r.application.as_deref()),
        }
    }
}

/// Result of `routes check`.
#[derive(Serialize)]
struct RouteCheck {
    route: String,
    exists: bool,
}

fn route_detail(route: &Route, name: &str) -> String {
    format!("Route {name} ({})", route.id)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ops: &CloudFoundryOperations,
    args: RoutesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let routes = ops.routes();

    match args.command {
        RoutesCommand::Check(spec) => {
            let target = spec.to_target()?;
            let result = RouteCheck {
                route: target.display_name(),
                exists: routes.check(&target).await?,
            };
            let out = output::render_single(
                global.format(),
                &result,
                |c| {
                    if c.exists {
                        format!("Route {} does exist", c.route)
                    } else {
                        format!("Route {} does not exist", c.route)
                    }
                },
                |c| c.exists.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::Create { space, route } => {
            let target = route.to_target()?;
            let created = routes.create(&target, &space).await?;
            let name = target.display_name();
            let out = output::render_single(
                global.format(),
                &created,
                |r| route_detail(r, &name),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::Map { app, route } => {
            let target = route.to_target()?;
            routes.map(&app, &target).await?;
            output::print_status(
                &format!("Mapped {} to {app}", target.display_name()),
                global.quiet,
            );
            Ok(())
        }

        RoutesCommand::Unmap { app, route } => {
            let target = route.to_target()?;
            routes.unmap(&app, &target).await?;
            output::print_status(
                &format!("Unmapped {} from {app}", target.display_name()),
                global.quiet,
            );
            Ok(())
        }

        RoutesCommand::Delete(spec) => delete(ops, &spec, global).await,

        RoutesCommand::List { level } => {
            let level = Level::from(level);
            let summaries: Vec<RouteSummary> = routes.list(level).try_collect().await?;
            let out = output::render_list(
                global.format(),
                &summaries,
                |r| RouteRow::from(r),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::DeleteOrphaned => {
            if !util::confirm(
                "Delete every orphaned route in the targeted space?",
                "routes delete-orphaned",
                global.yes,
            )? {
                return Ok(());
            }
            let sweep = routes.delete_orphaned_routes().await?;
            let out = output::render_single(
                global.format(),
                &sweep,
                |s| {
                    format!(
                        "Deleted {} orphaned route(s), kept {}",
                        s.deleted.len(),
                        s.skipped
                    )
                },
                |s| s.deleted.join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn delete(
    ops: &CloudFoundryOperations,
    spec: &RouteSpec,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = spec.to_target()?;
    let name = target.display_name();
    if !util::confirm(
        &format!("Delete route {name}?"),
        "routes delete",
        global.yes,
    )? {
        return Ok(());
    }
    ops.routes().delete(&target).await?;
    output::print_status(&format!("Deleted route {name}"), global.quiet);
    Ok(())
}
