use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Instrument};

use admin_console::app_system::{setup_tracing, AdminSystem, AppConfig};
use admin_console::domain::{Brand, Order, OrderLine, User};
use admin_console::navigation::{GuardOutcome, Navigator, ResourceKind, Route};
use admin_console::resource_framework::{FormModel, Resource};
use admin_console::views::{DeleteOutcome, Mode, SortDirection, SubmitOutcome};

#[derive(Debug, Parser)]
#[command(name = "admin-console", about = "Administración de pedidos, marcas y usuarios")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the in-process demo backend instead of HTTP
    #[arg(long)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints one page of a collection
    List {
        /// usuario, pedido, detalle-pedido or marca
        resource: String,
        /// Column header to sort by
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Renders the screen at an in-app path, e.g. /editar-marca/1
    Open {
        route: Route,
    },
    /// Logs in and prints the access token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Scripted create/edit/delete walkthrough
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let system = if args.memory {
        AdminSystem::in_memory(config)
    } else {
        AdminSystem::connect(config).await?
    };

    let result = run(&system, args.command).await;
    system.shutdown().await?;
    result
}

async fn run(system: &AdminSystem, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List {
            resource,
            sort,
            desc,
            page,
        } => {
            let kind = ResourceKind::from_slug(&resource).ok_or_else(|| anyhow!("Unknown resource '{resource}'"))?;
            let options = ListOptions { sort, desc, page };
            match kind {
                ResourceKind::Users => print_list::<User>(system, options).await,
                ResourceKind::Orders => print_list::<Order>(system, options).await,
                ResourceKind::OrderLines => print_list::<OrderLine>(system, options).await,
                ResourceKind::Brands => print_list::<Brand>(system, options).await,
            }
        }
        Command::Open { route } => open_route(system, route).await,
        Command::Login { username, password } => {
            let tokens = system.auth_client.login(&username, &password).await?;
            println!("{}", tokens.access);
            Ok(())
        }
        Command::Demo => run_demo(system).instrument(tracing::info_span!("demo")).await,
    }
}

struct ListOptions {
    sort: Option<String>,
    desc: bool,
    page: usize,
}

async fn print_list<T: Resource>(system: &AdminSystem, options: ListOptions) -> anyhow::Result<()> {
    let mut nav = Navigator::new(Route::List(T::KIND));
    let mut view = system.open_list::<T>(&mut nav).await;

    let table = view.table_mut();
    if let Some(header) = &options.sort {
        let direction = if options.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        if !table.sort_by(header, direction) {
            bail!("Unknown column '{header}', expected one of: {}", table.headers().join(", "));
        }
    }
    table.set_page(options.page.saturating_sub(1));

    println!("{}", view.render());
    Ok(())
}

async fn open_route(system: &AdminSystem, route: Route) -> anyhow::Result<()> {
    let kind = match route {
        Route::Home => {
            for kind in ResourceKind::ALL {
                println!("{:<22}{}", kind.title(), Route::List(kind));
            }
            return Ok(());
        }
        Route::Login => {
            println!("{route}: admin-console login --username <usuario> --password <contraseña>");
            return Ok(());
        }
        Route::List(kind) | Route::Create(kind) | Route::Edit(kind, _) | Route::Delete(kind, _) => kind,
    };

    let screen = match (kind, &route) {
        (ResourceKind::Orders, Route::Create(_)) => system.open_order_form(Mode::Create).await.render(),
        (ResourceKind::Orders, Route::Edit(_, id)) => system.open_order_form(Mode::Edit(*id)).await.render(),
        (ResourceKind::Users, _) => render_screen::<User>(system, &route).await,
        (ResourceKind::Orders, _) => render_screen::<Order>(system, &route).await,
        (ResourceKind::OrderLines, _) => render_screen::<OrderLine>(system, &route).await,
        (ResourceKind::Brands, _) => render_screen::<Brand>(system, &route).await,
    };
    println!("{screen}");
    Ok(())
}

async fn render_screen<T: FormModel>(system: &AdminSystem, route: &Route) -> String {
    match *route {
        Route::Create(_) => system.open_form::<T>(Mode::Create).await.render(),
        Route::Edit(_, id) => system.open_form::<T>(Mode::Edit(id)).await.render(),
        Route::Delete(_, id) => system.open_delete::<T>(id).await.render(),
        _ => {
            let mut nav = Navigator::new(route.clone());
            system.open_list::<T>(&mut nav).await.render()
        }
    }
}

async fn run_demo(system: &AdminSystem) -> anyhow::Result<()> {
    let mut nav = Navigator::new(Route::Login);
    system.auth_client.login("admin", "admin").await?;
    nav.navigate(Route::Home);

    info!("Creating a brand");
    nav.navigate(Route::Create(ResourceKind::Brands));
    let mut form = system.open_form::<Brand>(Mode::Create).await;
    form.change("name", "Initech")?;
    form.change("description", "Software a medida\nSoporte")?;
    form.change("date", "01-06-2024")?;
    println!("{}\n", form.render());
    if form.submit(&mut nav).await != SubmitOutcome::Saved {
        bail!("Brand was not saved: {}", form.render());
    }
    println!("{}\n", system.open_list::<Brand>(&mut nav).await.render());

    info!("Editing a brand, cancelling once");
    let brand = system
        .brand_client
        .list_brands()
        .await?
        .first()
        .map(|brand| brand.id)
        .context("No brands to edit")?;
    nav.navigate(Route::Edit(ResourceKind::Brands, brand));
    let mut form = system.open_form::<Brand>(Mode::Edit(brand)).await;
    form.change("description", "Herramientas, ferretería y jardín")?;
    if let GuardOutcome::Prompt(question) = form.cancel(&mut nav) {
        println!("{question} -> no");
        form.resolve(&mut nav, false);
    }
    if form.submit(&mut nav).await != SubmitOutcome::Saved {
        bail!("Brand was not updated: {}", form.render());
    }
    println!("{}\n", system.open_list::<Brand>(&mut nav).await.render());

    info!("Creating an order for a user");
    nav.navigate(Route::Create(ResourceKind::Orders));
    let mut order = system.open_order_form(Mode::Create).await;
    let user = order
        .users()
        .first()
        .map(|user| user.id)
        .context("No users to pick from")?;
    order.select_user(user)?;
    order.change("national_id", "33444555")?;
    order.change("date", "2024-06-02")?;
    println!("{}\n", order.render());
    if order.submit(&mut nav).await != SubmitOutcome::Saved {
        bail!("Order was not saved: {}", order.render());
    }
    println!("{}\n", system.open_list::<Order>(&mut nav).await.render());

    info!("Deleting an order line");
    let line = system
        .order_line_client
        .list_order_lines()
        .await?
        .first()
        .map(|line| line.id)
        .context("No order lines to delete")?;
    nav.navigate(Route::Delete(ResourceKind::OrderLines, line));
    let mut delete = system.open_delete::<OrderLine>(line).await;
    println!("{}", delete.render());
    if delete.confirm(&mut nav).await == DeleteOutcome::Failed {
        bail!("Delete failed: {}", delete.render());
    }
    println!("{}", system.open_list::<OrderLine>(&mut nav).await.render());
    Ok(())
}
