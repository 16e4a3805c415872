//! Plain-text rendering of canteens, opening days and meals.
//!
//! Everything here is side-effect free; callers decide where the text goes.

use crate::models::{Audience, Canteen, CanteenDate, DayMeals, Meal, PriceSet};
use std::fmt::Write;

/// Which meal details to render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub show_price: bool,
    pub show_notes: bool,
    pub show_category: bool,
    /// Restrict price output to a single audience
    pub audience: Option<Audience>,
    /// Leave out the pupils line when it is exactly zero
    pub hide_zero_pupils: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_price: false,
            show_notes: false,
            show_category: false,
            audience: None,
            hide_zero_pupils: true,
        }
    }
}

impl DisplayOptions {
    /// Prices, notes and categories, every audience.
    pub fn detailed() -> Self {
        Self {
            show_price: true,
            show_notes: true,
            show_category: true,
            ..Self::default()
        }
    }

    /// Restricting to one audience implies showing prices.
    pub fn with_audience(mut self, audience: Option<Audience>) -> Self {
        self.audience = audience;
        if audience.is_some() {
            self.show_price = true;
        }
        self
    }
}

pub fn canteen_to_string(canteen: &Canteen) -> String {
    format!(
        "ID: {}\n\tName: {}\n\tCity: {}\n\tAddress: {}\n",
        canteen.id, canteen.name, canteen.city, canteen.address
    )
}

pub fn canteen_list_to_string(canteens: &[Canteen]) -> String {
    let mut out = String::new();
    for canteen in canteens {
        out.push_str(&canteen_to_string(canteen));
        out.push('\n');
    }
    out
}

fn price_line(out: &mut String, audience: Audience, amount: f64) {
    let _ = writeln!(out, "\t\t- {}: {:.2}€", audience.label(), amount);
}

/// Price block for one meal, starting with its `Price:`/`Prices:` header.
pub fn prices_to_string(prices: &PriceSet, options: &DisplayOptions) -> String {
    let mut out = String::new();

    if let Some(audience) = options.audience {
        out.push_str("\tPrice:\n");
        price_line(&mut out, audience, prices.for_audience(audience));
        return out;
    }

    out.push_str("\tPrices:\n");
    for audience in Audience::ALL {
        let amount = prices.for_audience(audience);
        if audience == Audience::Pupil && amount == 0.0 && options.hide_zero_pupils {
            continue;
        }
        price_line(&mut out, audience, amount);
    }
    out
}

pub fn meal_to_string(meal: &Meal, options: &DisplayOptions) -> String {
    let mut out = format!("Meal: {}\n", meal.name);

    if options.show_category {
        let _ = write!(out, "\tCategory:\n\t\t- {}\n", meal.category);
    }

    if options.show_notes {
        out.push_str("\tNotes:\n");
        for note in &meal.notes {
            let _ = writeln!(out, "\t\t- {}", note);
        }
    }

    if options.show_price {
        out.push_str(&prices_to_string(&meal.prices, options));
    }

    out
}

fn numbered_meals(out: &mut String, meals: &[Meal], options: &DisplayOptions) {
    if meals.is_empty() {
        out.push_str("\tNo meals listed.\n");
        return;
    }
    for (i, meal) in meals.iter().enumerate() {
        let _ = write!(out, "{} {}", i + 1, meal_to_string(meal, options));
    }
}

/// Meals of a single day, headed by the canteen name and date.
pub fn day_meals_to_string(canteen_name: &str, day: &DayMeals, options: &DisplayOptions) -> String {
    let mut out = format!("{} meals for date: {}", canteen_name, day.day.date);
    if day.day.closed {
        out.push_str(" (closed)");
    }
    out.push_str(":\n");
    numbered_meals(&mut out, &day.meals, options);
    out
}

/// Meals of several days, one block per day.
pub fn week_meals_to_string(canteen_name: &str, week: &[DayMeals], options: &DisplayOptions) -> String {
    let (Some(first), Some(last)) = (week.first(), week.last()) else {
        return format!("{} has no upcoming days listed.\n", canteen_name);
    };

    let mut out = format!(
        "{} meals for dates: {} - {}\n",
        canteen_name, first.day.date, last.day.date
    );
    for (i, day) in week.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "-> {}", day.day.date);
        if day.day.closed {
            out.push_str(" (closed)");
        }
        out.push_str(":\n");
        numbered_meals(&mut out, &day.meals, options);
    }
    out
}

fn status_line(day: &CanteenDate) -> String {
    let status = if day.closed { "closed" } else { "open" };
    format!(" - {} -> {}", day.date, status)
}

/// Opening status of one day, optionally headed by the canteen name.
pub fn date_status_to_string(day: &CanteenDate, canteen_name: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(name) = canteen_name.filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "{} is open or closed on the following date:", name);
    }
    out.push_str(&status_line(day));
    out
}

pub fn date_list_to_string(days: &[CanteenDate], canteen_name: &str) -> String {
    let mut out = format!("{} is open or closed on the following dates:\n", canteen_name);
    for day in days {
        let _ = writeln!(out, "\t{}", status_line(day));
    }
    out
}
