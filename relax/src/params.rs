use env_param::EnvParam;

/// Upper bound on a relaxation-amount variable and the magnitude used to
/// gate an inactive disjunct in the conceptual big-M encoding (§4.5),
/// grounded on `compute_relaxation.py`'s `MAX_NUMERIC_BOUND`.
pub static BIG_M: EnvParam<f64> = EnvParam::new("BCDR_BIG_M", "100000");

/// Strictness margin subtracted from a conflict's closing bound before it is
/// canonicalized to `<=` form (§4.5), grounded on `compute_relaxation.py`'s
/// `NUMERIC_STABLE_EPSILON`.
pub static EPSILON: EnvParam<f64> = EnvParam::new("BCDR_EPSILON", "0.0001");

/// Decimal places a solved relaxation amount is rounded to before being
/// reported back as a [`bcdr_tpn::Relaxation`], grounded on
/// `compute_relaxation.py`'s `ROUND_DIGITS`.
pub static ROUND_DIGITS: EnvParam<i32> = EnvParam::new("BCDR_ROUND_DIGITS", "3");
