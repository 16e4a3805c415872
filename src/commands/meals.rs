use super::Session;
use super::utils::{print_failure, target_canteen};
use anyhow::Result;
use mensa::error::MensaError;
use mensa::format::{self, DisplayOptions};

fn report_missing_days(name: &str, when: &str, error: &MensaError) {
    if error.is_not_found() {
        print_failure(format!("{} has no listed days for {}.", name, when));
    } else {
        print_failure(format!("Could not fetch the {} plan of {}: {}", when, name, error));
    }
}

pub async fn today(session: &Session, id: Option<u32>, options: &DisplayOptions) -> Result<()> {
    let Some(canteen) = target_canteen(session, id).await? else {
        return Ok(());
    };

    match session.api.meals_today(canteen.id).await {
        Ok(day) => print!("{}", format::day_meals_to_string(&canteen.name, &day, options)),
        Err(e) => report_missing_days(&canteen.name, "today", &e),
    }
    Ok(())
}

pub async fn tomorrow(session: &Session, id: Option<u32>, options: &DisplayOptions) -> Result<()> {
    let Some(canteen) = target_canteen(session, id).await? else {
        return Ok(());
    };

    match session.api.meals_tomorrow(canteen.id).await {
        Ok(day) => print!("{}", format::day_meals_to_string(&canteen.name, &day, options)),
        Err(e) => report_missing_days(&canteen.name, "tomorrow", &e),
    }
    Ok(())
}

pub async fn week(session: &Session, id: Option<u32>, options: &DisplayOptions) -> Result<()> {
    let Some(canteen) = target_canteen(session, id).await? else {
        return Ok(());
    };

    match session.api.meals_week(canteen.id).await {
        Ok(days) => print!("{}", format::week_meals_to_string(&canteen.name, &days, options)),
        Err(e) => report_missing_days(&canteen.name, "the coming week", &e),
    }
    Ok(())
}
