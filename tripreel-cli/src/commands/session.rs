//! Implementation of the 'session' subcommand.
//!
//! Without an action the session summary is printed. Edits are saved
//! immediately.

use crate::cli::{Cli, ProfileArgs, SessionAction, SessionArgs};
use crate::commands::load_session;
use crate::error::CliResult;
use crate::terminal;

use tripreel_core::session::QUEST_MAX;
use tripreel_core::{AttractionCategory, TravelerProfile, TripSession};

fn print_summary(session: &TripSession) {
    terminal::print_section("Trip session");
    match &session.profile {
        Some(profile) => {
            terminal::print_status("Party", &profile.party_size, false);
            terminal::print_status("Companions", &profile.companions, false);
            terminal::print_status("Transport", &profile.transport, false);
            terminal::print_status("Budget", &profile.budget, false);
        }
        None => terminal::print_status("Profile", "not entered", false),
    }
    terminal::print_status(
        "Destination",
        session.destination.as_deref().unwrap_or("not chosen"),
        true,
    );
    for category in AttractionCategory::ALL {
        let name = session
            .attractions
            .get(&category)
            .map_or("-", String::as_str);
        let uploads = session.uploads.get(&category).map_or(0, Vec::len);
        terminal::print_status(
            &category.to_string(),
            &format!("{name} ({uploads} clip(s))"),
            false,
        );
    }
    terminal::print_status(
        "Quest",
        &terminal::quest_bar(session.progress, QUEST_MAX, 20),
        true,
    );
    if let Some(key) = &session.merged_key {
        terminal::print_status("Merged video", key, true);
    }
}

fn profile_from(args: &ProfileArgs) -> TravelerProfile {
    TravelerProfile {
        party_size: args.party_size.clone(),
        companions: args.companions.clone(),
        transport: args.transport.clone(),
        budget: args.budget.clone(),
        ages: args.ages.clone(),
        genders: args.genders.clone(),
    }
}

pub fn run_session(cli: &Cli, args: &SessionArgs) -> CliResult<()> {
    let mut session = load_session(cli)?;

    match &args.action {
        None | Some(SessionAction::Show) => {
            print_summary(&session);
            return Ok(());
        }
        Some(SessionAction::Request { category }) => {
            let text = match category {
                Some(category) => session.attraction_request(*category)?,
                None => session.describe_request()?,
            };
            println!("{text}");
            return Ok(());
        }
        Some(SessionAction::Profile(profile)) => {
            session.set_profile(profile_from(profile));
            terminal::print_success("Traveler profile saved");
        }
        Some(SessionAction::Destination { name }) => {
            session.set_destination(name);
            terminal::print_success(&format!("Destination set to {}", name.trim()));
        }
        Some(SessionAction::Attraction { category, name }) => {
            session.set_attraction(*category, name);
            terminal::print_success(&format!("{category} attraction set to {}", name.trim()));
        }
    }

    session.save(&cli.session)
}
