use rust_decimal::Decimal;

/// Minutes after scheduled start within which arrival is not late.
pub const DEFAULT_GRACE_MINUTES: i64 = 15;

/// Flat divisor for monthly proration, regardless of calendar month length.
pub const PRORATION_DAYS: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Statutory premium applied to hours worked on holidays and weekends.
pub const OVERTIME_PREMIUM: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5

/// Schedules below this length never produce shortage deductions.
pub const SHORTAGE_FLOOR_HOURS: Decimal = Decimal::from_parts(25, 0, 0, false, 2); // 0.25

/// Tolerance for the allowances-minus-deductions = net identity.
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 4); // 0.0001

/// Required hours assumed when a schedule has none recorded.
pub const FALLBACK_DAILY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Decimal places for hour values.
pub const HOUR_DP: u32 = 2;
/// Decimal places for currency amounts.
pub const MONEY_DP: u32 = 4;

// Fixed transaction-type codes for system-generated entries and payroll lines.
pub const TT_BASIC: &str = "BASIC";
pub const TT_OVERTIME: &str = "OT_ATTN";
pub const TT_LATE: &str = "LATE_DED";
pub const TT_EARLY_OUT: &str = "EARLY_DED";
pub const TT_SHORTAGE: &str = "SHORT_DED";
pub const TT_ABSENCE: &str = "ABS_DED";
pub const TT_LOAN: &str = "LOAN_INST";

/// Request type under which payroll headers enter the approval workflow.
pub const APPROVAL_REQUEST_PAYROLL: &str = "PAYROLL";
