use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use pivot_wrap::math::{AllowedAngles, Composition};
use pivot_wrap::operations::DEFAULT_BONE_MARKER;
use pivot_wrap::{Command, Project};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let project_arg = Arg::with_name("project")
        .required(true)
        .index(1)
        .help("Project file to edit");
    let output_arg = Arg::with_name("output")
        .short("o")
        .long("output")
        .takes_value(true)
        .help("Write the result here instead of overwriting the project");
    let bone_rig_arg = Arg::with_name("bone-rig")
        .long("bone-rig")
        .help("Tag new pivots as rig bones");
    let allowed_arg = Arg::with_name("allowed-angles")
        .long("allowed-angles")
        .takes_value(true)
        .possible_values(&["base", "extended"])
        .help("Allowed rotation set, overriding the project setting");
    let strategy_arg = Arg::with_name("strategy")
        .long("strategy")
        .takes_value(true)
        .required(true)
        .possible_values(&["exact", "additive"])
        .help("How pivot and leaf rotations are combined");

    let wrap_command = |name: &'static str, about: &'static str| {
        SubCommand::with_name(name)
            .about(about)
            .arg(project_arg.clone())
            .arg(output_arg.clone())
            .arg(bone_rig_arg.clone())
            .arg(allowed_arg.clone())
    };
    let unwrap_command = |name: &'static str, about: &'static str| {
        SubCommand::with_name(name)
            .about(about)
            .arg(project_arg.clone())
            .arg(output_arg.clone())
            .arg(strategy_arg.clone())
    };

    let matches = App::new("pivot_wrap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Moves illegal leaf rotations into pivots and back")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(wrap_command(
            "fix-illegal-wrap",
            "Wrap leaves with illegal rotations into rotated pivots",
        ))
        .subcommand(wrap_command(
            "force-wrap-zero",
            "Wrap every leaf into a pivot and zero its rotation",
        ))
        .subcommand(wrap_command(
            "add-zero-rotation-group",
            "Wrap every leaf into an unrotated group",
        ))
        .subcommand(
            unwrap_command("unwrap-by-name", "Flatten bone pivots back into their leaves").arg(
                Arg::with_name("marker")
                    .long("marker")
                    .takes_value(true)
                    .default_value(DEFAULT_BONE_MARKER)
                    .help("Name fragment identifying bone pivots"),
            ),
        )
        .subcommand(unwrap_command(
            "unwrap-any-recursive",
            "Flatten every pivot, innermost first",
        ))
        .get_matches();

    let (name, sub_matches) = matches.subcommand();
    let sub_matches = match sub_matches {
        Some(sub_matches) => sub_matches,
        None => bail!("No command given"),
    };

    let command = parse_command(name, sub_matches)?;
    run(&command, sub_matches)
}

fn parse_command(name: &str, matches: &ArgMatches) -> Result<Command> {
    let composition = || match matches.value_of("strategy") {
        Some("exact") => Ok(Composition::Exact),
        Some("additive") => Ok(Composition::Additive),
        other => bail!("Unknown strategy {:?}", other),
    };

    let command = match name {
        "fix-illegal-wrap" => Command::FixIllegalWrap,
        "force-wrap-zero" => Command::ForceWrapZero,
        "add-zero-rotation-group" => Command::AddZeroRotationGroup,
        "unwrap-by-name" => Command::UnwrapByName {
            marker: matches
                .value_of("marker")
                .unwrap_or(DEFAULT_BONE_MARKER)
                .to_string(),
            composition: composition()?,
        },
        "unwrap-any-recursive" => Command::UnwrapAnyRecursive {
            composition: composition()?,
        },
        other => bail!("Unknown command {}", other),
    };

    Ok(command)
}

fn run(command: &Command, matches: &ArgMatches) -> Result<()> {
    let project_path = Path::new(matches.value_of("project").context("Missing project path")?);
    let output_path = matches.value_of("output").map_or(project_path, Path::new);

    let text = fs::read_to_string(project_path)
        .with_context(|| format!("Failed to read {}", project_path.display()))?;
    let mut project = Project::from_json(&text)
        .with_context(|| format!("Failed to parse {}", project_path.display()))?;

    if matches.is_present("bone-rig") {
        project.config.bone_rig = true;
    }
    match matches.value_of("allowed-angles") {
        Some("base") => project.config.allowed_angles = AllowedAngles::Base,
        Some("extended") => project.config.allowed_angles = AllowedAngles::Extended,
        _ => {}
    }

    let mut editor = project.into_editor()?;
    command
        .execute(&mut editor)
        .with_context(|| format!("{} failed", command.name()))?;

    for notice in editor.notices() {
        println!("{}", notice);
    }

    if editor.undo_steps().is_empty() {
        log::debug!("Nothing changed, leaving {} untouched", output_path.display());
        return Ok(());
    }

    let json = Project::from_editor(&editor).to_json()?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    log::info!("Saved {}", output_path.display());

    Ok(())
}
