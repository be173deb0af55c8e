//! # Validation Observers
//!
//! Diagnostic hook invoked at each validation stage. Observers carry no
//! control-flow significance: swapping [`TracingObserver`] for
//! [`NoopObserver`] never changes a validation outcome.

/// A validation stage reported to a [`ValidationObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationStage<'a> {
    /// The email domain was compared against the whitelist.
    EmailDomainChecked {
        /// Domain part of the email.
        domain: &'a str,
        /// Whether the domain is whitelisted.
        accepted: bool,
    },
    /// The name was normalized to its stored form.
    NameTransformed {
        /// Raw input.
        from: &'a str,
        /// Stored form.
        to: &'a str,
    },
    /// A record-level rule ran against the assembled record.
    CrossFieldChecked {
        /// Name of the record rule.
        rule: &'static str,
        /// Age of the assembled record.
        age: u32,
        /// Whether the rule passed.
        passed: bool,
    },
    /// BMI was derived from weight and height.
    BmiComputed {
        /// Unrounded weight / height².
        raw: f64,
        /// Value exposed on the record.
        rounded: f64,
    },
    /// A fully validated patient was produced.
    PatientCreated {
        /// Stored (uppercased) name.
        name: &'a str,
        /// Age in years.
        age: u32,
        /// Derived BMI.
        bmi: f64,
    },
}

/// Receives [`ValidationStage`] notifications.
///
/// Any `Fn(&ValidationStage<'_>) + Send + Sync` closure is an observer, so a
/// callback can be passed directly to
/// [`PatientValidator::with_observer`](super::PatientValidator::with_observer).
pub trait ValidationObserver: Send + Sync {
    /// Called once per stage, in pipeline order.
    fn on_stage(&self, stage: &ValidationStage<'_>);
}

impl<F> ValidationObserver for F
where
    F: Fn(&ValidationStage<'_>) + Send + Sync,
{
    fn on_stage(&self, stage: &ValidationStage<'_>) {
        self(stage)
    }
}

/// Default observer: emits a `tracing` event per stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ValidationObserver for TracingObserver {
    fn on_stage(&self, stage: &ValidationStage<'_>) {
        match *stage {
            ValidationStage::EmailDomainChecked { domain, accepted } => {
                tracing::debug!(domain, accepted, "checked email domain");
            }
            ValidationStage::NameTransformed { from, to } => {
                tracing::debug!(from, to, "transformed name");
            }
            ValidationStage::CrossFieldChecked { rule, age, passed } => {
                tracing::debug!(rule, age, passed, "ran record rule");
            }
            ValidationStage::BmiComputed { raw, rounded } => {
                tracing::debug!(raw, rounded, "computed BMI");
            }
            ValidationStage::PatientCreated { name, age, bmi } => {
                tracing::info!(name, age, bmi, "patient created");
            }
        }
    }
}

/// Observer that discards every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ValidationObserver for NoopObserver {
    fn on_stage(&self, _stage: &ValidationStage<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_are_observers() {
        let seen = Mutex::new(Vec::new());
        let observer = |stage: &ValidationStage<'_>| {
            if let ValidationStage::BmiComputed { rounded, .. } = stage {
                seen.lock().unwrap().push(*rounded);
            }
        };
        observer.on_stage(&ValidationStage::BmiComputed {
            raw: 22.857,
            rounded: 22.86,
        });
        assert_eq!(*seen.lock().unwrap(), vec![22.86]);
    }

    #[test]
    fn builtin_observers_accept_every_stage() {
        let stages = [
            ValidationStage::EmailDomainChecked {
                domain: "hdfc.com",
                accepted: true,
            },
            ValidationStage::NameTransformed {
                from: "John",
                to: "JOHN",
            },
            ValidationStage::CrossFieldChecked {
                rule: "emergency_contact",
                age: 30,
                passed: true,
            },
            ValidationStage::BmiComputed {
                raw: 1.0,
                rounded: 1.0,
            },
            ValidationStage::PatientCreated {
                name: "JOHN",
                age: 30,
                bmi: 1.0,
            },
        ];
        for stage in &stages {
            TracingObserver.on_stage(stage);
            NoopObserver.on_stage(stage);
        }
    }
}
