#![warn(clippy::uninlined_format_args)]

use std::{borrow::Cow, env, io, process};

use splitpot_application::{LedgerService, LedgerServiceError, SourceError};
use splitpot_domain::ValidationFailure;
use splitpot_infrastructure::{GreedySettlementOptimizer, JsonLedgerFile, Settings};
use splitpot_presentation::LedgerPresenter;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    let _ = dotenvy::dotenv();
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: splitpot-interpreter <group.json>".into());
    };

    let settings = Settings::from_env().map_err(|err| format!("Invalid configuration: {err}"))?;
    tracing::debug!(
        epsilon = %settings.epsilon,
        split_tolerance = %settings.split_tolerance,
        "Settings loaded"
    );

    let optimizer = GreedySettlementOptimizer;
    let service = LedgerService::new(&optimizer)
        .with_epsilon(settings.epsilon)
        .with_split_tolerance(settings.split_tolerance);

    let source = JsonLedgerFile::new(&path);
    let report = service.load_report(&source).map_err(format_service_error)?;

    print!("{}", LedgerPresenter::render(&report));
    Ok(())
}

fn format_service_error(err: LedgerServiceError) -> Cow<'static, str> {
    match err {
        LedgerServiceError::Source(SourceError::Unreadable { path, detail }) => {
            format!("Failed to read '{path}': {detail}").into()
        }
        LedgerServiceError::Source(SourceError::Malformed(detail)) => {
            format!("Group file is not a valid ledger: {detail}").into()
        }
        LedgerServiceError::Ledger(err) => format!("Invalid ledger: {err}").into(),
        LedgerServiceError::UnverifiedTransfers(ValidationFailure::Unbalanced {
            participant,
            residual,
        }) => format!(
            "Settlement plan check failed: '{participant}' would be left with {residual}"
        )
        .into(),
        LedgerServiceError::UnverifiedTransfers(failure) => {
            format!("Settlement plan check failed: {failure}").into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitpot_domain::{LedgerError, Money, ParticipantId, RecordRef};

    #[test]
    fn unbalanced_plan_names_the_participant() {
        let message = format_service_error(LedgerServiceError::UnverifiedTransfers(
            ValidationFailure::Unbalanced {
                participant: ParticipantId::new("bob"),
                residual: Money::from_cents(-250),
            },
        ));
        assert_eq!(
            message,
            "Settlement plan check failed: 'bob' would be left with -2.50"
        );
    }

    #[test]
    fn ledger_errors_keep_their_location() {
        let message = format_service_error(LedgerServiceError::Ledger(
            LedgerError::UnknownParticipant {
                id: ParticipantId::new("zed"),
                at: RecordRef::Settlement(1),
            },
        ));
        assert_eq!(
            message,
            "Invalid ledger: Unknown participant 'zed' referenced by settlement #2"
        );
    }
}
