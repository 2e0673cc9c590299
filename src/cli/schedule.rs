use chrono::{Local, NaiveDate, NaiveDateTime};
use colored::Colorize;
use serde_json::{Map, Value};
use tabled::Table;

use super::{client, spinner};
use crate::{
    error,
    output::{channel_title, format_program, format_program_line, header, print_json},
    raiplay::RaiPlayClient,
    types::{ChannelTableRow, Event, Schedule},
    utils, warning,
};

/// Typology/genre filter applied to schedule events.
#[derive(Debug, Clone, Default)]
pub struct ProgramFilter {
    pub typology: Option<String>,
    pub genre: Option<String>,
}

impl ProgramFilter {
    fn apply<'a>(&self, events: Vec<&'a Event>) -> Vec<&'a Event> {
        utils::filter_by_dfp(events, self.typology.as_deref(), self.genre.as_deref())
    }
}

fn resolve_date(date: Option<&str>, now: NaiveDateTime) -> NaiveDate {
    match utils::parse_date(date, now.date()) {
        Ok(d) => d,
        Err(e) => error!("{}", e),
    }
}

/// Fetches the schedules of `channels`, skipping those that fail.
async fn fetch_schedules(
    client: &RaiPlayClient,
    channels: &[&str],
    date: &str,
) -> Vec<(String, Schedule)> {
    let pb = spinner("Fetching schedules...");
    let mut schedules = Vec::new();

    for channel in channels {
        pb.set_message(format!("Fetching {} schedule for {}...", channel, date));
        match client.fetch_schedule(channel, date).await {
            Ok(schedule) => schedules.push((channel.to_string(), schedule)),
            Err(e) => pb.suspend(|| warning!("{}", e)),
        }
    }

    pb.finish_and_clear();
    schedules
}

fn schedules_to_json(schedules: &[(String, Schedule)]) -> Value {
    let map: Map<String, Value> = schedules
        .iter()
        .map(|(channel, schedule)| (channel.clone(), schedule.raw.clone()))
        .collect();
    Value::Object(map)
}

/// Shows what is on air on every channel, or full schedules for another day.
pub async fn now(
    channel: Option<String>,
    date: Option<String>,
    filter: &ProgramFilter,
    compact: bool,
    json: bool,
) {
    let now = Local::now().naive_local();
    let date = resolve_date(date.as_deref(), now);
    let is_today = date == now.date();
    let date_str = utils::format_api_date(date);

    let mut channels: Vec<&str> = utils::ALL_CHANNELS.to_vec();
    if let Some(wanted) = channel {
        let wanted = utils::normalize_channel(&wanted);
        channels.retain(|c| c.contains(wanted.as_str()));
    }

    let client = client();
    let schedules = fetch_schedules(&client, &channels, &date_str).await;

    if json {
        print_json(&schedules_to_json(&schedules));
        return;
    }

    if is_today {
        println!(
            "{}\n",
            header(&format!("Ora in onda - {}", now.format("%H:%M")))
        );
    } else {
        println!("{}\n", header(&format!("Palinsesto - {}", date_str)));
    }

    for (slug, schedule) in &schedules {
        let channel_name = schedule.channel.as_deref().unwrap_or(slug);
        let events = schedule.programs();

        if is_today {
            let current = utils::find_current_program(&events, now);
            let Some(program) = current.and_then(|p| filter.apply(vec![p]).into_iter().next())
            else {
                continue;
            };

            let name = program.name_or("Unknown");
            if compact {
                println!("{}: {}", channel_name, name);
                continue;
            }

            println!("{}", channel_title(channel_name));
            let time = program.hour_or("");
            let duration = utils::format_duration(program.duration_str());
            if duration.is_empty() {
                println!("  {} - {}", time, name.bold());
            } else {
                println!("  {} - {} ({})", time, name.bold(), duration);
            }

            if let Some(description) = program.description.as_deref().filter(|d| !d.is_empty()) {
                println!("  {}", utils::truncate(description, 120).italic());
            }
            println!();
        } else {
            println!("{}", channel_title(channel_name));
            for event in filter.apply(events) {
                if compact {
                    println!("  {} {}", event.hour_or("??:??"), event.name_or("Unknown"));
                } else {
                    println!("  {}", format_program_line(event, "??:??"));
                }
            }
            println!();
        }
    }
}

/// Shows the schedule of one channel.
pub async fn schedule(
    channel: String,
    date: Option<String>,
    from: Option<String>,
    to: Option<String>,
    filter: &ProgramFilter,
    compact: bool,
    json: bool,
) {
    let now = Local::now().naive_local();
    let date = resolve_date(date.as_deref(), now);
    let date_str = utils::format_api_date(date);
    let slug = utils::normalize_channel(&channel);

    if !json {
        println!(
            "{}\n",
            header(&format!("{} - {}", channel.to_uppercase(), date_str))
        );
    }

    let client = client();
    let schedule = match client.fetch_schedule(&slug, &date_str).await {
        Ok(schedule) => schedule,
        Err(e) => {
            warning!("{}", e);
            if json {
                print_json(&Vec::<Value>::new());
            } else {
                println!("No schedule data available.");
            }
            return;
        }
    };

    if json {
        print_json(&schedule.raw);
        return;
    }

    let events = utils::filter_by_time_range(schedule.programs(), from.as_deref(), to.as_deref());
    let events = filter.apply(events);
    let is_today = date == now.date();

    for event in &events {
        let current =
            is_today && utils::is_current_program(event.hour_or(""), event.duration_str(), now);
        println!("{}", format_program(event, current, compact));
    }

    if events.is_empty() {
        println!("No programs found for the specified time range.");
    }
}

/// Lists the channels of the RaiPlay guide.
pub async fn channels(json: bool) {
    let client = client();
    let pb = spinner("Fetching channels...");
    let result = client.fetch_channels().await;
    pb.finish_and_clear();

    let guide = match result {
        Ok(guide) => guide,
        Err(e) => {
            if json {
                print_json(&Vec::<Value>::new());
            } else {
                warning!("Error fetching channels: {}", e);
            }
            return;
        }
    };

    if json {
        print_json(&guide.raw);
        return;
    }

    println!("{}\n", header("Canali disponibili"));
    let rows: Vec<ChannelTableRow> = guide
        .channels
        .iter()
        .map(|c| ChannelTableRow {
            label: c.label.clone(),
            option: format!("--channel {}", c.absolute_path),
        })
        .collect();

    println!("{}", Table::new(rows));
}

/// Shows the 20:00-23:59 schedule of the three main channels.
pub async fn prime_time(date: Option<String>, filter: &ProgramFilter, json: bool) {
    let now = Local::now().naive_local();
    let date_str = utils::format_api_date(resolve_date(date.as_deref(), now));

    let client = client();
    let schedules = fetch_schedules(&client, &utils::PRIME_TIME_CHANNELS, &date_str).await;

    if json {
        print_json(&schedules_to_json(&schedules));
        return;
    }

    println!("{}\n", header(&format!("Prima Serata - {}", date_str)));

    for (slug, schedule) in &schedules {
        println!("{}", channel_title(schedule.channel.as_deref().unwrap_or(slug)));

        let prime: Vec<&Event> = schedule
            .programs()
            .into_iter()
            .filter(|e| utils::is_prime_time(e.hour_or("00:00")))
            .collect();

        for event in filter.apply(prime) {
            println!("  {}", format_program_line(event, "00:00"));
        }
        println!();
    }
}

/// Finds programs whose name contains `query` on the main channels.
pub async fn search(query: String, date: Option<String>, filter: &ProgramFilter, json: bool) {
    let now = Local::now().naive_local();
    let date_str = utils::format_api_date(resolve_date(date.as_deref(), now));
    let needle = query.to_lowercase();

    let client = client();
    let schedules = fetch_schedules(&client, &utils::SEARCH_CHANNELS, &date_str).await;

    let mut found: Vec<(String, Event)> = Vec::new();
    for (slug, schedule) in &schedules {
        let channel_name = schedule.channel.clone().unwrap_or_else(|| slug.clone());
        let matching: Vec<&Event> = schedule
            .programs()
            .into_iter()
            .filter(|e| e.name_or("").to_lowercase().contains(&needle))
            .collect();

        for event in filter.apply(matching) {
            found.push((channel_name.clone(), event.clone()));
        }
    }

    if json {
        let events: Vec<&Value> = found.iter().map(|(_, e)| &e.raw).collect();
        print_json(&events);
        return;
    }

    println!(
        "{}\n",
        header(&format!("Ricerca: '{}' - {}", query, date_str))
    );

    if found.is_empty() {
        println!("Nessun programma trovato con '{}'", query);
        return;
    }

    for (channel_name, event) in &found {
        println!(
            "{} - {}",
            channel_title(channel_name),
            event.hour_or("??:??")
        );

        let name = event.name_or("").bold();
        let duration = utils::format_duration(event.duration_str());
        if duration.is_empty() {
            println!("  {}\n", name);
        } else {
            println!("  {} ({})\n", name, duration);
        }
    }
}
