use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest `n` whose Fibonacci number fits in a `u64`.
pub const MAX_N: i64 = 93;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FibError {
    #[error("invalid argument: n must be non-negative, got {n}")]
    InvalidArgument { n: i64 },
    #[error("fib({n}) does not fit in 64 bits")]
    Overflow { n: i64 },
}

fn check(n: i64) -> Result<(), FibError> {
    if n < 0 {
        return Err(FibError::InvalidArgument { n });
    }
    Ok(())
}

/// Computes the n'th fibonacci number by naive recursion.
///
/// Runs in exponential time and recurses `n` frames deep. Negative `n` is
/// rejected up front instead of recursing forever, and `n` past [`MAX_N`]
/// is rejected before the first call.
pub fn fib(n: i64) -> Result<u64, FibError> {
    check(n)?;
    if n > MAX_N {
        return Err(FibError::Overflow { n });
    }
    fib_rec(n)
}

fn fib_rec(n: i64) -> Result<u64, FibError> {
    if n <= 1 {
        return Ok(n as u64);
    }
    fib_rec(n - 1)?
        .checked_add(fib_rec(n - 2)?)
        .ok_or(FibError::Overflow { n })
}

/// Computes the n'th fibonacci number with a left fold over two running values.
pub fn fib_iter(n: i64) -> Result<u64, FibError> {
    check(n)?;
    if n == 0 {
        return Ok(0);
    }

    let mut a: u64 = 0;
    let mut b: u64 = 1;
    for _ in 1..n {
        let sum = a.checked_add(b).ok_or(FibError::Overflow { n })?;
        a = b;
        b = sum;
    }

    Ok(b)
}

// [0, 1, 2, 3] = |0 1|
//                |2 3|
type Matrix2x2 = [u128; 4];

fn matmul(a: Matrix2x2, b: Matrix2x2) -> Matrix2x2 {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
    ]
}

fn fast_matexp(b: Matrix2x2, e: u64) -> Matrix2x2 {
    if e == 0 {
        [1, 0, 0, 1] // identity matrix
    } else if e % 2 == 1 {
        matmul(b, fast_matexp(matmul(b, b), (e - 1) / 2))
    } else {
        fast_matexp(matmul(b, b), e / 2)
    }
}

/// Computes the n'th fibonacci number by fast exponentiation of `|0 1; 1 1|`.
pub fn fastfib(n: i64) -> Result<u64, FibError> {
    check(n)?;
    // Keeps the intermediate squares well inside u128.
    if n > MAX_N {
        return Err(FibError::Overflow { n });
    }
    let m = fast_matexp([0, 1, 1, 1], n as u64);
    u64::try_from(m[1]).map_err(|_| FibError::Overflow { n })
}

/// How the host computes the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Naive,
    Iter,
    Fast,
}

impl Strategy {
    pub fn compute(self, n: i64) -> Result<u64, FibError> {
        match self {
            Strategy::Naive => fib(n),
            Strategy::Iter => fib_iter(n),
            Strategy::Fast => fastfib(n),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Iter => "iter",
            Strategy::Fast => "fast",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}', expected one of: naive, iter, fast")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(Strategy::Naive),
            "iter" => Ok(Strategy::Iter),
            "fast" => Ok(Strategy::Fast),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
