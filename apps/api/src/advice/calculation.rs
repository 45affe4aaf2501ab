//! Loan product selection and first-month payment estimate.
//!
//! Pure functions of (age, loan amount, loan term). Every prompt variant reads
//! its figures from `assess`, never from its own arithmetic.

/// Loan ceiling for the Z HOME product, in VND.
pub const STANDARD_HOME_MAX_AMOUNT: f64 = 10_000_000_000.0;
pub const STANDARD_HOME_MIN_AGE: u32 = 18;
pub const STANDARD_HOME_MAX_AGE: u32 = 40;

/// The two fixed home-loan products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanProduct {
    /// "Z HOME": first home, age 18-40, up to 10 billion VND.
    StandardHome,
    /// "PRIME HOME": second property onward, no ceiling.
    PremiumHome,
}

impl LoanProduct {
    pub const ALL: [LoanProduct; 2] = [LoanProduct::StandardHome, LoanProduct::PremiumHome];

    pub fn display_name(self) -> &'static str {
        match self {
            LoanProduct::StandardHome => "Z HOME",
            LoanProduct::PremiumHome => "PRIME HOME",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            LoanProduct::StandardHome => "Nhà chất, trả chill",
            LoanProduct::PremiumHome => "An cư đẳng cấp",
        }
    }

    pub fn audience(self) -> &'static str {
        match self {
            LoanProduct::StandardHome => "18-40 tuổi, mua nhà lần đầu",
            LoanProduct::PremiumHome => "Mua bất động sản thứ 2 trở lên",
        }
    }

    /// `None` means unbounded.
    pub fn max_amount(self) -> Option<f64> {
        match self {
            LoanProduct::StandardHome => Some(STANDARD_HOME_MAX_AMOUNT),
            LoanProduct::PremiumHome => None,
        }
    }

    /// Promotional annual rate for the first 12 months, as a fraction.
    pub fn annual_rate_promo(self) -> f64 {
        match self {
            LoanProduct::StandardHome => 0.065,
            LoanProduct::PremiumHome => 0.08,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentEstimate {
    pub principal_per_month: f64,
    pub interest_month_1: f64,
    pub first_month_payment: f64,
}

/// Everything derived from an application: one source for every caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub product: LoanProduct,
    pub estimate: PaymentEstimate,
    pub affordable: bool,
}

impl Assessment {
    /// Amount by which the first-month payment exceeds income; zero when affordable.
    pub fn shortfall(&self, income: f64) -> f64 {
        (self.estimate.first_month_payment - income).max(0.0)
    }
}

pub fn recommend_product(age: u32, loan_amount: f64) -> LoanProduct {
    let age_eligible = (STANDARD_HOME_MIN_AGE..=STANDARD_HOME_MAX_AGE).contains(&age);
    if age_eligible && loan_amount <= STANDARD_HOME_MAX_AMOUNT {
        LoanProduct::StandardHome
    } else {
        LoanProduct::PremiumHome
    }
}

/// Level principal plus one month of interest on the full balance.
/// Not compound amortization.
pub fn estimate_first_month(loan_amount: f64, loan_term_years: u32, product: LoanProduct) -> PaymentEstimate {
    let months = f64::from(loan_term_years) * 12.0;
    let principal_per_month = loan_amount / months;
    let interest_month_1 = loan_amount * (product.annual_rate_promo() / 12.0);

    PaymentEstimate {
        principal_per_month,
        interest_month_1,
        first_month_payment: principal_per_month + interest_month_1,
    }
}

pub fn assess(age: u32, income: f64, loan_amount: f64, loan_term_years: u32) -> Assessment {
    let product = recommend_product(age, loan_amount);
    let estimate = estimate_first_month(loan_amount, loan_term_years, product);

    Assessment {
        product,
        estimate,
        // Equality counts as affordable.
        affordable: income >= estimate.first_month_payment,
    }
}
