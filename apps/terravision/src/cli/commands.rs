//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every invocation is one visit: the shell boots from the database, the
//! command runs, and the mounted journey is flushed on the way out.

use super::JourneyAction;
use crate::config::AppConfig;
use crate::runtime::Driver;
use std::path::PathBuf;
use std::rc::Rc;
use terravision_core::catalog::{self, pattern_glyphs, story_prelude};
use terravision_core::journey::{ProgressState, StagePanel};
use terravision_core::storage::redb_store::unix_now_secs;
use terravision_core::{
    JourneyView, LocalTime, PassportRecord, RedbStore, Shell, SnapshotStore, TerraError,
    TimerSupport, TopStage, hydrate,
};

/// Options shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub database: PathBuf,
    pub instant: bool,
    pub json_mode: bool,
    pub quiet: bool,
}

impl RunOptions {
    /// Whether typed feeds and countdowns should be printed.
    fn narrate(&self) -> bool {
        !self.quiet && !self.json_mode
    }
}

// =============================================================================
// SESSION SETUP
// =============================================================================

/// Time of day on the UTC wall clock.
fn local_time_now() -> LocalTime {
    let of_day = unix_now_secs() % 86_400;
    let hour = u8::try_from(of_day / 3_600).unwrap_or(0);
    let minute = u8::try_from(of_day % 3_600 / 60).unwrap_or(0);
    LocalTime::new(hour, minute)
}

/// Boot a shell on the database.
///
/// `skip_transitions` completes transition interludes synchronously; the
/// journey keeps its own timing.
fn open_shell(
    opts: &RunOptions,
    config: &AppConfig,
    skip_transitions: bool,
) -> Result<(Shell, Driver), TerraError> {
    let db = RedbStore::open(&opts.database)?;
    let mut shell_config = config.shell_config(opts.instant, local_time_now());
    if skip_transitions {
        shell_config.transition.support = TimerSupport::Unavailable;
    }

    let mut shell = Shell::new(
        shell_config,
        Rc::new(db.journey_slot()),
        Rc::new(db.passport_slot()),
    );
    let driver = Driver::new();
    shell.boot(driver.now());
    tracing::debug!(database = %opts.database.display(), stage = %shell.stage(), "shell booted");
    Ok((shell, driver))
}

fn require_passport(shell: &Shell) -> Result<(), TerraError> {
    if shell.profile().is_none() {
        return Err(TerraError::InvalidPassport(
            "no passport issued yet, run `terravision issue` first".to_string(),
        ));
    }
    Ok(())
}

/// Enter the journey, skipping the interlude if transitions are instant.
async fn enter_journey(shell: &mut Shell, driver: &Driver, opts: &RunOptions) -> bool {
    if shell.stage() != TopStage::Journey {
        shell.nav_select(TopStage::Journey, driver.now());
    }
    if shell.stage() == TopStage::Transition && !driver.run_transition(shell, !opts.narrate()).await
    {
        return false;
    }
    shell.journey().is_some()
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show the stored passport and journey without mounting anything.
pub fn cmd_status(opts: &RunOptions, _config: &AppConfig) -> Result<(), TerraError> {
    let db = RedbStore::open(&opts.database)?;
    let passport = db
        .passport_slot()
        .read_snapshot()
        .as_ref()
        .and_then(PassportRecord::from_value);
    let journey = db.journey_slot().read_snapshot().map(|v| hydrate(&v));

    if opts.json_mode {
        let output = serde_json::json!({
            "database": opts.database.to_string_lossy(),
            "passport": passport.as_ref().map(|r| &r.profile),
            "mission": passport.as_ref().map(|r| catalog::mission(&r.mission_key).title),
            "journey": journey.as_ref().map(|h| serde_json::json!({
                "stage": h.state.stage,
                "step": h.state.stage.index() + 1,
                "stamps": h.state.stamps.len(),
                "ambientOn": h.ambient_on,
            })),
        });
        print_json(&output);
        return Ok(());
    }

    println!("TerraVision Status");
    println!("==================");
    println!("Database: {:?}", opts.database);
    println!();
    match &passport {
        Some(record) => {
            let p = &record.profile;
            println!("Traveler:  {}", p.name);
            println!("Passport:  {}", p.passport_id);
            println!("Born:      {} (age {} in 2050)", p.dob, p.age_in_2050);
            println!("Mission:   {}", catalog::mission(&record.mission_key).title);
        }
        None => println!("No passport issued."),
    }
    println!();
    match &journey {
        Some(h) => {
            println!("Journey:   step {}/7, {}", h.state.stage.index() + 1, h.state.stage);
            println!("Stamps:    {}", h.state.stamps.len());
            println!("Ambient:   {}", if h.ambient_on { "on" } else { "off" });
        }
        None => println!("Journey not started."),
    }
    Ok(())
}

// =============================================================================
// ISSUE COMMAND
// =============================================================================

/// Issue a passport and run the passport sequence.
pub async fn cmd_issue(
    opts: &RunOptions,
    config: &AppConfig,
    name: &str,
    dob: &str,
) -> Result<(), TerraError> {
    let (mut shell, driver) = open_shell(opts, config, false)?;
    let profile = shell.submit_passport(name, dob, driver.now())?;
    let completed = driver.run_transition(&mut shell, !opts.narrate()).await;
    let mission = catalog::mission(shell.mission_key());

    if opts.json_mode {
        let output = serde_json::json!({
            "profile": profile,
            "missionKey": mission.key,
            "mission": mission.title,
            "brief": mission.brief,
            "sequenceComplete": completed,
        });
        print_json(&output);
        return Ok(());
    }

    println!();
    println!("TerraVision Passport");
    println!("--------------------");
    println!("Name:        {}", profile.name);
    println!("Passport ID: {}", profile.passport_id);
    println!("Born:        {}", profile.dob);
    println!("Age in 2050: {}", profile.age_in_2050);
    println!("Mission:     {}", mission.title);
    println!("             {}", mission.brief);
    if !completed {
        println!();
        println!("Sequence interrupted; the passport is saved.");
    }
    Ok(())
}

// =============================================================================
// PRELUDE COMMAND
// =============================================================================

/// Show the story prelude, then continue into the journey.
pub async fn cmd_prelude(opts: &RunOptions, config: &AppConfig) -> Result<(), TerraError> {
    let (mut shell, driver) = open_shell(opts, config, false)?;
    require_passport(&shell)?;
    shell.open_story();

    let prelude = match shell.profile() {
        Some(profile) => story_prelude(profile, catalog::mission(shell.mission_key())),
        None => return Ok(()),
    };

    if opts.json_mode {
        print_json(&serde_json::to_value(&prelude).unwrap_or_default());
    } else {
        println!("Prelude Transmission");
        println!();
        println!("{}", prelude.headline);
        println!("{}", prelude.subline);
        println!();
        println!("Why you? {}", prelude.why);
        println!("Mission brief: {}", prelude.brief);
        println!();
        for (label, detail) in &prelude.milestones {
            println!("  {:<20} {}", label, detail);
        }
        println!();
    }

    shell.continue_to_journey(driver.now());
    if !driver.run_transition(&mut shell, !opts.narrate()).await {
        return Ok(());
    }
    if let Some(journey) = shell.journey() {
        if !opts.json_mode {
            print_view(&journey.view());
        }
    }
    shell.flush();
    Ok(())
}

// =============================================================================
// JOURNEY COMMAND
// =============================================================================

/// Apply one journey action and show the resulting stage.
pub async fn cmd_journey(
    opts: &RunOptions,
    config: &AppConfig,
    action: JourneyAction,
) -> Result<(), TerraError> {
    let (mut shell, driver) = open_shell(opts, config, true)?;
    require_passport(&shell)?;
    if !enter_journey(&mut shell, &driver, opts).await {
        return Ok(());
    }

    let now = driver.now();
    let Some(journey) = shell.journey_mut() else {
        return Ok(());
    };
    journey.drain_cues();
    let accepted = match &action {
        JourneyAction::Show => true,
        JourneyAction::Begin => journey.begin_journey(),
        JourneyAction::Seat { id } => journey.select_seat(id),
        JourneyAction::Launch => journey.launch(now),
        JourneyAction::Focus { id } => journey.select_focus(id),
        JourneyAction::Habitat { id } => journey.select_habitat(id),
        JourneyAction::Node { number } => number
            .checked_sub(1)
            .is_some_and(|index| journey.toggle_mini_node(index)),
        JourneyAction::Crisis { id } => journey.select_crisis(id),
        JourneyAction::Timeline { id } => journey.select_timeline(id),
        JourneyAction::Confirm => journey.confirm(now),
        JourneyAction::Back => journey.retreat(),
        JourneyAction::Restart => {
            journey.restart();
            true
        }
    };
    let stage = journey.stage();
    tracing::debug!(?action, accepted, stage = stage.as_str(), "journey action");

    driver.settle_journey(&mut shell, !opts.narrate()).await;
    shell.flush();

    let Some(journey) = shell.journey_mut() else {
        return Ok(());
    };
    let cues = journey.drain_cues();
    let view = journey.view();

    if opts.json_mode {
        let output = serde_json::json!({
            "accepted": accepted,
            "cues": cues,
            "view": view,
        });
        print_json(&output);
        return Ok(());
    }

    if !accepted {
        println!("Not available at {} ({}).", stage.title(), stage);
        println!();
    }
    print_view(&view);
    Ok(())
}

// =============================================================================
// AMBIENT COMMAND
// =============================================================================

/// Switch the ambient preference; stored through the journey snapshot.
pub fn cmd_ambient(opts: &RunOptions, config: &AppConfig, on: bool) -> Result<(), TerraError> {
    let (mut shell, driver) = open_shell(opts, config, true)?;
    if shell.profile().is_some() && shell.stage() != TopStage::Journey {
        shell.nav_select(TopStage::Journey, driver.now());
    }
    shell.set_ambient(on);
    shell.flush();
    let saved = shell.journey().is_some();

    if opts.json_mode {
        print_json(&serde_json::json!({ "ambientOn": shell.ambient_on(), "saved": saved }));
        return Ok(());
    }
    println!("Ambient soundscape {}.", if shell.ambient_on() { "on" } else { "off" });
    if !saved {
        println!("Not saved: issue a passport first.");
    }
    Ok(())
}

// =============================================================================
// RENDERING
// =============================================================================

fn mark(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

/// Print one frame of the journey.
pub fn print_view(view: &JourneyView) {
    println!("Step {}/7  {}", view.step, view.title);
    println!("{}", view.subtitle);

    let progress: Vec<&str> = view
        .progress
        .iter()
        .map(|p| match p.state {
            ProgressState::Done => "●",
            ProgressState::Current => "◉",
            ProgressState::Upcoming => "○",
        })
        .collect();
    println!("{}", progress.join(" "));
    println!();

    if let Some(intro) = &view.intro {
        println!("({}/{}) {}", intro.index + 1, intro.total, intro.text);
        println!("`terravision journey begin` to skip the intro.");
        println!();
    }

    match &view.panel {
        StagePanel::Launch { seats, countdown } => {
            for seat in seats {
                println!("  {} {}  {}  {}", mark(seat.selected), seat.id, seat.label, seat.detail);
            }
            if let Some(n) = countdown {
                println!("  Ignition in {}", n);
            }
        }
        StagePanel::AiGuide { feed, archetypes } => {
            for line in feed {
                println!("  > {}", line);
            }
            println!();
            for option in archetypes {
                println!("  {} {:<10} {}", mark(option.selected), option.id, option.label);
                println!("      {}", option.detail);
            }
        }
        StagePanel::Colony { habitats } => {
            for option in habitats {
                println!("  {} {:<9} {}", mark(option.selected), option.id, option.label);
                println!("      {}", option.detail);
            }
        }
        StagePanel::Purpose {
            mission,
            brief,
            role,
            target,
            nodes,
            solved,
        } => {
            println!("  Mission: {}", mission);
            println!("  {}", brief);
            println!("  Future role: {}", role);
            println!();
            println!("  Target: {}", pattern_glyphs(target));
            println!("  Nodes:  {}", pattern_glyphs(nodes));
            if *solved {
                println!("  Pattern aligned.");
            }
        }
        StagePanel::Crisis {
            title,
            description,
            options,
        } => {
            println!("  {}", title);
            println!("  {}", description);
            println!();
            for option in options {
                println!("  {} {:<10} {}", mark(option.selected), option.id, option.label);
                if option.selected {
                    println!("      {}", option.detail);
                }
            }
        }
        StagePanel::Vision { options } => {
            for option in options {
                println!("  {} {}  {}", mark(option.selected), option.id, option.label);
                if option.selected {
                    println!("      {}", option.detail);
                }
            }
        }
        StagePanel::Legacy { certificate } => {
            println!("  Certificate of Passage");
            println!("  Traveler:  {}", certificate.traveler);
            if let Some(id) = &certificate.passport_id {
                println!("  Passport:  {}", id);
            }
            println!("  Role:      {}", certificate.role);
            if let Some(focus) = certificate.focus {
                println!("  Focus:     {}", focus);
            }
            if let Some(habitat) = certificate.habitat {
                println!("  Habitat:   {}", habitat);
            }
            if let Some(crisis) = &certificate.crisis {
                println!("  Crisis:    {}", crisis);
            }
            if let Some(timeline) = &certificate.timeline {
                println!("  Timeline:  {}", timeline);
            }
            println!("  Stamps:    {}", certificate.stamp_count);
        }
    }

    if !view.stamps.is_empty() {
        println!();
        for stamp in &view.stamps {
            println!("  ✓ {}  {}", stamp.label, stamp.detail);
        }
    }

    println!();
    let mut hints = Vec::new();
    if view.can_advance {
        hints.push("`journey confirm` to continue");
    }
    if view.can_retreat {
        hints.push("`journey back` to step back");
    }
    if !hints.is_empty() {
        println!("{}", hints.join(", "));
    }
}
