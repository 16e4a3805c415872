use super::Session;
use super::utils::{print_failure, target_canteen};
use anyhow::Result;
use mensa::format;
use mensa::models::parse_date;

/// Opening status for `date`, or for today when no date is given.
pub async fn status(session: &Session, id: Option<u32>, date: Option<&str>) -> Result<()> {
    if let Some(date) = date {
        if let Err(e) = parse_date(date) {
            print_failure(format!("{}. Please use the format YYYY-MM-DD.", e));
            return Ok(());
        }
    }

    let Some(canteen) = target_canteen(session, id).await? else {
        return Ok(());
    };

    let result = match date {
        Some(date) => session.api.date_status(canteen.id, date).await,
        None => session.api.today(canteen.id).await,
    };

    match result {
        Ok(day) => println!("{}", format::date_status_to_string(&day, Some(&canteen.name))),
        Err(e) => print_failure(format!(
            "Could not retrieve the opening status of {}: {}",
            canteen.name, e
        )),
    }
    Ok(())
}

pub async fn week_status(session: &Session, id: Option<u32>) -> Result<()> {
    let Some(canteen) = target_canteen(session, id).await? else {
        return Ok(());
    };

    match session.api.week(canteen.id).await {
        Ok(days) => print!("{}", format::date_list_to_string(&days, &canteen.name)),
        Err(e) => print_failure(format!(
            "Could not retrieve the next days of {}. Maybe check the mensa ID: {}",
            canteen.name, e
        )),
    }
    Ok(())
}
