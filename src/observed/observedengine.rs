use std::collections::BTreeSet;

use chrono::{
    Datelike,
    NaiveDate,
    TimeDelta
};
use log::trace;

use super::observedrule::{
    ObservedRule,
    ObservedShift
};
use crate::entity::entityconfig::{
    LabelTemplate,
    ObservedLabels
};
use crate::entity::yearcontext::YearContext;

/// Outcome of an observance request, the `(shifted, date)` pair of a rule application.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ObservedResult {
    /// Nothing was recorded; carries the nominal date.
    NotShifted(NaiveDate),
    /// An observed entry was computed for this date.
    Shifted(NaiveDate),
    /// A suppressing rule removed the holiday.
    Dropped
}

impl ObservedResult {
    pub fn is_shifted(&self) -> bool {
        matches!(self, ObservedResult::Shifted(_))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ObservedResult::NotShifted(date) | ObservedResult::Shifted(date) => Some(*date),
            ObservedResult::Dropped => None
        }
    }
}

/// Per-call options of `add_observed` and `move_holiday`.
#[derive(Clone, Copy, Debug)]
pub struct ObservedRequest<'r> {
    rule: Option<&'r ObservedRule>,
    name: Option<&'r str>,
    show_label: bool
}

impl<'r> ObservedRequest<'r> {
    pub fn new() -> ObservedRequest<'r> {
        ObservedRequest {
            rule: None,
            name: None,
            show_label: true
        }
    }

    /// Rule used instead of the entity default.
    pub fn rule(mut self, rule: &'r ObservedRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Shift only this name instead of every name on the date.
    pub fn name(mut self, name: &'r str) -> Self {
        self.name = Some(name);
        self
    }

    /// Record the observed entry under the plain name.
    pub fn hide_label(mut self) -> Self {
        self.show_label = false;
        self
    }
}

impl Default for ObservedRequest<'_> {
    fn default() -> Self {
        ObservedRequest::new()
    }
}

/// Applies weekday-indexed observance rules to the year being populated.
#[derive(Clone, Copy, Debug)]
pub struct ObservedEngine<'a> {
    enabled: bool,
    default_rule: ObservedRule,
    observed_since: Option<i32>,
    labels: &'a ObservedLabels
}

impl<'a> ObservedEngine<'a> {
    pub fn new(
        enabled: bool,
        default_rule: ObservedRule,
        observed_since: Option<i32>,
        labels: &'a ObservedLabels
    ) -> ObservedEngine<'a> {
        ObservedEngine {
            enabled,
            default_rule,
            observed_since,
            labels
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_rule(&self) -> ObservedRule {
        self.default_rule
    }

    pub fn observed_since(&self) -> Option<i32> {
        self.observed_since
    }

    pub fn is_observed(&self, date: NaiveDate) -> bool {
        self.enabled && self.observed_since.is_none_or(|since| date.year() >= since)
    }

    /// Observed date of `date` under `rule`; `None` when the rule suppresses it.
    pub fn get_observed_date(&self, ctx: &YearContext<'_>, date: NaiveDate, rule: &ObservedRule) -> Option<NaiveDate> {
        match rule.shift(date.weekday()) {
            None => Some(date),
            Some(ObservedShift::Days(days)) => Some(
                date.checked_add_signed(TimeDelta::days(days as i64)).unwrap_or(date)
            ),
            Some(ObservedShift::NextWorkday) => Some(Self::next_workday(ctx, date, 1)),
            Some(ObservedShift::PreviousWorkday) => Some(Self::next_workday(ctx, date, -1)),
            Some(ObservedShift::Suppress) => None
        }
    }

    /// Walks from `date` one day at a time in the direction of `step`, skipping
    /// weekend days and recorded holidays. The walk never leaves the year being
    /// populated; if it would, `date` itself is returned.
    fn next_workday(ctx: &YearContext<'_>, date: NaiveDate, step: i64) -> NaiveDate {
        let mut current = date;
        loop {
            current = match current.checked_add_signed(TimeDelta::days(step)) {
                Some(next) if next.year() == ctx.year() => next,
                _ => return date
            };
            if !(ctx.contains(current) || ctx.is_weekend(current)) {
                return current;
            }
        }
    }

    pub fn add_observed(&self, ctx: &mut YearContext<'_>, date: NaiveDate, request: &ObservedRequest<'_>) -> ObservedResult {
        if !self.is_observed(date) {
            return ObservedResult::NotShifted(date);
        }

        let rule = request.rule.copied().unwrap_or(self.default_rule);
        let observed = match self.get_observed_date(ctx, date, &rule) {
            Some(observed) if observed == date => return ObservedResult::NotShifted(date),
            Some(observed) => observed,
            None => {
                trace!("holiday on {} suppressed by observed rule", date);
                Self::remove_nominal(ctx, date, request);
                return ObservedResult::Dropped;
            }
        };

        let names = match request.name {
            Some(name) => vec![name.to_owned()],
            None => ctx.get_list(date)
        };

        if request.show_label {
            let label = self.translated(ctx, if observed < date {
                self.labels.observed_before()
            } else {
                self.labels.observed()
            });
            let estimated_text = self.labels
                .estimated()
                .map(|estimated| self.translated(ctx, estimated))
                .map(|estimated| estimated.bare_text().to_owned())
                .unwrap_or_default();

            for name in names.iter() {
                let mut holiday_name = ctx.tr(name).into_owned();
                let mut template = &label;
                let observed_estimated;
                if !estimated_text.is_empty() && holiday_name.contains(&estimated_text) {
                    holiday_name = holiday_name.replace(&format!("({})", estimated_text), "").trim().to_owned();
                    if let Some(estimated_label) = self.labels.observed_estimated() {
                        observed_estimated = self.translated(ctx, estimated_label);
                        template = &observed_estimated;
                    }
                }
                ctx.add_holiday(&template.apply(&holiday_name), observed);
            }
        } else {
            for name in names.iter() {
                ctx.add_holiday(name, observed);
            }
        }

        trace!("holiday on {} observed on {}", date, observed);
        ObservedResult::Shifted(observed)
    }

    /// Like `add_observed`, but the nominal entry is removed once shifted.
    /// A named request removes only that name from the nominal date.
    pub fn move_holiday(&self, ctx: &mut YearContext<'_>, date: NaiveDate, request: &ObservedRequest<'_>) -> ObservedResult {
        let result = self.add_observed(ctx, date, request);
        if result.is_shifted() {
            Self::remove_nominal(ctx, date, request);
        }
        result
    }

    fn remove_nominal(ctx: &mut YearContext<'_>, date: NaiveDate, request: &ObservedRequest<'_>) {
        match request.name {
            Some(name) => {
                ctx.pop_name(date, name);
            }
            None => {
                ctx.pop(date);
            }
        }
    }

    /// Applies `add_observed` to every date in ascending order. With `multiple`,
    /// each name recorded on a date gets its own observed entry.
    pub fn populate_observed<I>(&self, ctx: &mut YearContext<'_>, dates: I, multiple: bool)
        where I: IntoIterator<Item = NaiveDate> {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        for date in dates {
            if !self.is_observed(date) {
                continue;
            }
            if multiple {
                for name in ctx.get_list(date) {
                    self.add_observed(ctx, date, &ObservedRequest::new().name(&name));
                }
            } else {
                self.add_observed(ctx, date, &ObservedRequest::new());
            }
        }
    }

    fn translated(&self, ctx: &YearContext<'_>, template: &LabelTemplate) -> LabelTemplate {
        LabelTemplate::new(ctx.tr(template.as_str()).into_owned())
    }
}
