use super::Session;
use super::utils::{describe_lookup_error, print_failure, spinner, target_canteen};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use mensa::config::DefaultCanteenConfig;
use mensa::format;
use mensa::models::Canteen;

/// Keep canteens whose city contains `city`, ignoring case
fn filter_by_city(canteens: Vec<Canteen>, city: Option<&str>) -> Vec<Canteen> {
    let Some(city) = city.map(str::to_lowercase) else {
        return canteens;
    };
    canteens
        .into_iter()
        .filter(|c| c.city.to_lowercase().contains(&city))
        .collect()
}

pub async fn list(session: &Session, city: Option<&str>) -> Result<()> {
    let pb = spinner("Fetching all mensas...");
    let result = session.api.fetch_all_canteens().await;
    pb.finish_and_clear();

    let canteens = match result {
        Ok(canteens) => canteens,
        Err(e) => {
            print_failure(format!("Could not fetch the list of mensas: {}", e));
            return Ok(());
        }
    };

    let canteens = filter_by_city(canteens, city);
    if canteens.is_empty() {
        match city {
            Some(city) => print_failure(format!("No mensas found in '{}'", city)),
            None => print_failure("No mensas found"),
        }
        return Ok(());
    }

    print!("{}", format::canteen_list_to_string(&canteens));
    println!(
        "{} {} mensas",
        "✓".green(),
        canteens.len().to_string().bold()
    );
    Ok(())
}

pub async fn show(session: &Session, id: Option<u32>) -> Result<()> {
    if let Some(canteen) = target_canteen(session, id).await? {
        print!("{}", format::canteen_to_string(&canteen));
    }
    Ok(())
}

/// Look up `id` and store it as the default canteen.
///
/// Both a failed lookup and a failed save are errors.
pub async fn set_default(session: &Session, id: u32) -> Result<()> {
    let canteen = match session.api.canteen(id).await {
        Ok(canteen) => canteen,
        Err(e) => bail!(
            "Could not set the default mensa. {}",
            describe_lookup_error(id, &e)
        ),
    };

    let config = DefaultCanteenConfig { canteen };
    session
        .store
        .save(&config)
        .with_context(|| format!("Failed to save {}", session.store.path().display()))?;

    println!(
        "{} Saved {} ({}) as your default mensa",
        "✓".green(),
        config.canteen.name.bold(),
        config.canteen.id
    );
    Ok(())
}

pub fn show_default(session: &Session) -> Result<()> {
    let path = session.store.path();
    match session.store.read() {
        Some(config) => {
            print!("{}", format::canteen_to_string(&config.canteen));
            println!("{}: {}", "Config".dimmed(), path.display());
        }
        None => {
            println!("No default mensa set. Use `mensa set-default <ID>`.");
            println!("{}: {}", "Config".dimmed(), path.display());
        }
    }
    Ok(())
}
