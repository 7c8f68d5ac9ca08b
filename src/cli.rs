//! The command-line surface: one subcommand per page of the original
//! portal (signup, login, vote, ballot, dashboard, register).

use anyhow::Context;
use clap::{Parser, Subcommand};

use election_portal::api::{self, ApiClient};
use election_portal::dashboard::Dashboard;
use election_portal::form::BallotForm;
use election_portal::model::auth::Credentials;
use election_portal::model::ballot::SingleVote;
use election_portal::model::candidate::Registration;
use election_portal::model::position::Position;
use election_portal::session::{FileTokenStore, Session, TokenStore};
use election_portal::{Config, Error};

const ABOUT_TEXT: &str = "Terminal client for the ITHS alumni committee election.

EXIT CODES:
    0: Success.
    2: Submission blocked by client-side validation.
Other: Error.";

#[derive(Debug, Parser)]
#[command(name = "election-portal", about = ABOUT_TEXT)]
pub struct Args {
    /// Backend API base URL, overriding the configuration.
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: PortalCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortalCommand {
    /// Create a committee account, then log in separately.
    Signup { email: String, surname: String },
    /// Log in as a committee member and store the session token.
    Login { email: String, surname: String },
    /// Discard the stored session token.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// List the registered candidates for every position.
    Candidates,
    /// Cast a single vote for one position.
    Vote {
        voter_email: String,
        position: Position,
        candidate_id: String,
    },
    /// Fill in and submit a complete ballot, one choice per position.
    Ballot {
        voter_name: String,
        voter_email: String,
        /// One selection per position, repeatable.
        #[arg(long = "pick", value_name = "POSITION=CANDIDATE_ID")]
        picks: Vec<String>,
    },
    /// Show vote totals and per-position leaders (committee only).
    Dashboard {
        /// Fetch once more through the manual-refresh path.
        #[arg(long)]
        refresh: bool,
    },
    /// Register as a candidate, if registration is open.
    Register {
        name: String,
        email: String,
        position: Position,
    },
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let base = args.api_base.as_deref().unwrap_or(config.api_base());
    let client = ApiClient::with_base(base, config.request_timeout())?;
    let mut session = Session::restore(FileTokenStore::new(config.token_file()));

    match args.command {
        PortalCommand::Signup { email, surname } => {
            api::auth::signup(&client, &Credentials { email, surname })?;
            println!("Signup successful! Now login.");
        }
        PortalCommand::Login { email, surname } => {
            let credentials = Credentials { email, surname };
            let (token, identity) = api::auth::login(&client, &credentials)?;
            session.establish(token, identity)?;
            println!("Login successful!");
        }
        PortalCommand::Logout => {
            session.logout();
            println!("Logged out.");
        }
        PortalCommand::Whoami => match session.identity() {
            Some(identity) => match &identity.surname {
                Some(surname) => println!("{} ({})", identity.email, surname),
                None => println!("{}", identity.email),
            },
            None if session.is_authenticated() => {
                println!("Logged in, but the token payload is not displayable.")
            }
            None => println!("Not logged in."),
        },
        PortalCommand::Candidates => {
            let group = api::candidates::fetch(&client)?;
            if group.is_empty() {
                println!("No candidates yet.");
            }
            for position in group.positions() {
                println!("{position}:");
                for candidate in group.candidates(position) {
                    println!("  {} ({})", candidate.name, candidate.email);
                }
            }
        }
        PortalCommand::Vote {
            voter_email,
            position,
            candidate_id,
        } => {
            // Same client-side gate as the dropdowns: the candidate must
            // actually stand for the chosen position.
            let group = api::candidates::fetch(&client)?;
            if group.candidate(position, &candidate_id).is_none() {
                return Err(Error::Validation(format!(
                    "No candidate {candidate_id} is standing for {position}"
                ))
                .into());
            }
            api::voting::cast(
                &client,
                &SingleVote {
                    voter_email,
                    position,
                    candidate_id,
                },
            )?;
            println!("Vote submitted successfully!");
        }
        PortalCommand::Ballot {
            voter_name,
            voter_email,
            picks,
        } => {
            let group = api::candidates::fetch(&client)?;
            let mut form = BallotForm::new(&group);
            form.set_voter(&voter_name, &voter_email);
            for pick in &picks {
                let (position, candidate_id) = parse_pick(pick)?;
                form.select(&group, position, &candidate_id)?;
            }

            let progress = form.progress();
            println!(
                "Selections: {}/{} positions",
                progress.selected, progress.total
            );

            match form.submit(&client) {
                Ok(()) => println!("Your ballot has been submitted. Thank you for voting!"),
                Err(err) if err.is_duplicate_vote() => {
                    eprintln!(
                        "You have already voted; your selections were cleared \
                         but your details were kept."
                    );
                    return Err(err.into());
                }
                Err(err) => return Err(err.into()),
            }
        }
        PortalCommand::Dashboard { refresh } => {
            let mut dashboard = match Dashboard::load(&client, &session) {
                Ok(dashboard) => dashboard,
                Err(err) => return Err(auth_failure(&mut session, err)),
            };
            if refresh {
                if let Err(err) = dashboard.refresh(&client, &session, false) {
                    return Err(auth_failure(&mut session, err));
                }
            }
            render_dashboard(&dashboard);
        }
        PortalCommand::Register {
            name,
            email,
            position,
        } => {
            if !config.registration_open() {
                print_registration_closed();
                return Ok(());
            }
            api::candidates::register(
                &client,
                &Registration {
                    name,
                    email,
                    position,
                },
            )?;
            println!("Candidate registered successfully!");
        }
    }

    Ok(())
}

/// Tear the session down on a 401 before reporting the error, so the next
/// invocation starts at the login step.
fn auth_failure<S: TokenStore>(session: &mut Session<S>, err: Error) -> anyhow::Error {
    if session.absorb_failure(&err) {
        eprintln!("Session expired. Please run `election-portal login` again.");
    }
    err.into()
}

/// Parse a `--pick "<position>=<candidate id>"` argument.
fn parse_pick(raw: &str) -> Result<(Position, String), Error> {
    let (position, candidate_id) = raw.split_once('=').ok_or_else(|| {
        Error::Validation(format!(
            "Expected POSITION=CANDIDATE_ID, got {raw:?}"
        ))
    })?;
    let position = position
        .trim()
        .parse::<Position>()
        .map_err(|e| Error::Validation(e.to_string()))?;
    Ok((position, candidate_id.trim().to_string()))
}

fn render_dashboard(dashboard: &Dashboard) {
    let stats = dashboard.stats();
    println!(
        "{} candidate{}, {} vote{}, {} contested position{}",
        stats.candidates,
        if stats.candidates != 1 { "s" } else { "" },
        stats.total_votes,
        if stats.total_votes != 1 { "s" } else { "" },
        stats.positions,
        if stats.positions != 1 { "s" } else { "" },
    );

    for position in dashboard.group().positions() {
        println!("{position}:");
        let leading = election_portal::dashboard::leader(dashboard.group().candidates(position));
        for candidate in dashboard.group().candidates(position) {
            let badge = match leading {
                Some(leader) if leader.id == candidate.id => "  [leading]",
                _ => "",
            };
            println!(
                "  {} ({}): {} vote{}{}",
                candidate.name,
                candidate.email,
                candidate.vote_count(),
                if candidate.vote_count() != 1 { "s" } else { "" },
                badge,
            );
        }
    }
}

fn print_registration_closed() {
    println!("Registration closed.");
    println!();
    println!(
        "Registration for committee positions is currently closed. Please run \
         `election-portal vote` to cast your vote for your preferred candidate."
    );
    println!();
    println!("If you believe this is an error, please contact the election committee.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_cli_usage() {
        Args::try_parse_from(["election-portal", "login", "a@example.com", "Okafor"]).unwrap();
        Args::try_parse_from(["election-portal", "logout"]).unwrap();
        Args::try_parse_from(["election-portal", "candidates"]).unwrap();
        Args::try_parse_from(["election-portal", "dashboard", "--refresh"]).unwrap();
        Args::try_parse_from([
            "election-portal",
            "vote",
            "voter@example.com",
            "Chairman",
            "c1",
        ])
        .unwrap();
        Args::try_parse_from([
            "election-portal",
            "--api-base",
            "https://election.example.org/api",
            "ballot",
            "Ada",
            "ada@example.com",
            "--pick",
            "Chairman=c1",
            "--pick",
            "PRO 1=c2",
        ])
        .unwrap();
    }

    #[test]
    fn bad_cli_usage() {
        // No subcommand at all.
        Args::try_parse_from(["election-portal"]).unwrap_err();

        // Unknown subcommand.
        Args::try_parse_from(["election-portal", "tally"]).unwrap_err();

        // Unknown position.
        Args::try_parse_from(["election-portal", "vote", "v@example.com", "Treasurer", "c1"])
            .unwrap_err();

        // Missing credentials.
        Args::try_parse_from(["election-portal", "login", "a@example.com"]).unwrap_err();
    }

    #[test]
    fn pick_parsing() {
        let (position, id) = parse_pick("Vice-Chairman=abc123").unwrap();
        assert_eq!(Position::ViceChairman, position);
        assert_eq!("abc123", id);

        let (position, id) = parse_pick("Secretary 1 = c9 ").unwrap();
        assert_eq!(Position::Secretary1, position);
        assert_eq!("c9", id);

        assert!(parse_pick("Chairman").is_err());
        assert!(parse_pick("Treasurer=c1").is_err());
    }
}
