//! Validator options.
//!
//! Two rules changed meaning over the life of the configuration format. The
//! current behaviour is the default; the older, stricter variants stay
//! selectable for sites still pinned to them.

/// How the `password` key is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PasswordRule {
    /// No password is fine; a present password must not be empty.
    #[default]
    NonEmptyIfPresent,
    /// A `password` key must exist. Its value is not inspected beyond type.
    Required,
}

/// What a `script` component must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ScriptRule {
    /// Inline `content` or a `url`, either one.
    #[default]
    ContentOrUrl,
    /// Inline `content` only.
    ContentRequired,
}

/// Whether validation stops at the first violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Stop at the first violation in document order.
    #[default]
    FailFast,
    /// Keep going and report every violation, in the order fail-fast would
    /// have met them.
    CollectAll,
}

/// Options controlling a [`Validator`](super::Validator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatorOptions {
    /// Password rule variant.
    pub password_rule: PasswordRule,
    /// Script rule variant.
    pub script_rule: ScriptRule,
    /// Fail-fast or collect-all.
    pub mode: ReportMode,
}
