use crate::text_table::{Alignment, TextTableBuilder};
use splitpot_application::{LedgerReport, ParticipantDirectory};
use splitpot_domain::{LedgerEntry, Money, Participant, ParticipantId, Transfer};
use std::{borrow::Cow, fmt};

const MEMBER: &str = "Member";
const PAID: &str = "Paid";
const OWED: &str = "Owed";
const NET: &str = "Net";
const FROM: &str = "From";
const TO: &str = "To";
const AMOUNT: &str = "Amount";
const ALL_SETTLED: &str = "All settled";

pub struct LedgerPresenter;

pub struct LedgerView {
    pub balance_table: String,
    pub transfer_table: Option<String>,
    pub imbalance_note: Option<String>,
}

impl fmt::Display for LedgerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.balance_table)?;
        writeln!(f)?;
        match &self.transfer_table {
            Some(table) => f.write_str(table)?,
            None => writeln!(f, "{ALL_SETTLED}")?,
        }
        if let Some(note) = &self.imbalance_note {
            writeln!(f)?;
            writeln!(f, "{note}")?;
        }
        Ok(())
    }
}

impl LedgerPresenter {
    pub fn render(report: &LedgerReport) -> LedgerView {
        Self::render_with_members(report, &EmptyParticipantDirectory)
    }

    /// Labels come from `directory` first, then from the recorded participant.
    pub fn render_with_members(
        report: &LedgerReport,
        directory: &dyn ParticipantDirectory,
    ) -> LedgerView {
        let transfer_table = (!report.transfers.is_empty())
            .then(|| Self::build_transfer_table(&report.transfers, directory));

        LedgerView {
            balance_table: Self::build_balance_table(&report.entries, directory),
            transfer_table,
            imbalance_note: report.imbalance.map(|imbalance| {
                format!(
                    "Warning: balances are off by {} and cannot be fully settled",
                    signed(imbalance)
                )
            }),
        }
    }

    pub fn build_balance_table(
        entries: &[LedgerEntry],
        directory: &dyn ParticipantDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(MEMBER),
                Cow::Borrowed(PAID),
                Cow::Borrowed(OWED),
                Cow::Borrowed(NET),
            ]);

        for entry in entries {
            builder = builder.row([
                format_participant_label(&entry.participant, directory),
                Cow::Owned(entry.total_paid.to_string()),
                Cow::Owned(entry.total_owed.to_string()),
                Cow::Owned(signed(entry.net)),
            ]);
        }

        builder.build()
    }

    pub fn build_transfer_table(
        transfers: &[Transfer],
        directory: &dyn ParticipantDirectory,
    ) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(FROM),
                Cow::Borrowed(TO),
                Cow::Borrowed(AMOUNT),
            ]);

        for transfer in transfers {
            builder = builder.row([
                format_participant_label(&transfer.from, directory),
                format_participant_label(&transfer.to, directory),
                Cow::Owned(transfer.amount.to_string()),
            ]);
        }

        builder.build()
    }
}

struct EmptyParticipantDirectory;

impl ParticipantDirectory for EmptyParticipantDirectory {
    fn display_name(&self, _id: &ParticipantId) -> Option<&str> {
        None
    }
}

fn format_participant_label<'a>(
    participant: &'a Participant,
    directory: &'a dyn ParticipantDirectory,
) -> Cow<'a, str> {
    match directory.display_name(&participant.id) {
        Some(name) => Cow::Borrowed(name),
        None if participant.name.is_empty() => Cow::Borrowed(participant.id.as_str()),
        None => Cow::Borrowed(participant.name.as_str()),
    }
}

fn signed(amount: Money) -> String {
    let rounded = amount.round_to_cents();
    let sign = if rounded.is_negative() { "" } else { "+" };
    format!("{sign}{rounded}")
}
