use core::fmt::{self, Write as _};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use rust_decimal::Decimal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FixedPointError;

/// Signed Q16.16 fixed-point number backed by an `i32`.
///
/// The represented value is always exactly `raw / 65536`.
///
/// Range: -32768.0 to 32767.9999847412109375
/// Precision: 0.0000152587890625 (2^-16)
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FixedPoint32 {
    raw: i32,
}

// ============================================================================
// Constants
// ============================================================================

impl FixedPoint32 {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 16;

    /// The scale factor: 2^16
    pub const SCALE: i32 = 1 << Self::FRAC_BITS;

    /// Mask selecting the fractional bits of the raw value.
    pub const FRAC_MASK: i32 = Self::SCALE - 1;

    /// Decimal digits needed to print any fraction exactly (2^-16 has 16).
    pub const DECIMALS: u8 = 16;

    /// Value of one raw step expressed in units of 10^-16.
    const DECIMAL_STEP: u64 = 152_587_890_625;

    /// Zero
    pub const ZERO: Self = Self { raw: 0 };

    /// One (1.0)
    pub const ONE: Self = Self { raw: Self::SCALE };

    /// Minus one (-1.0)
    pub const MINUS_ONE: Self = Self { raw: -Self::SCALE };

    /// One half (0.5)
    pub const HALF: Self = Self {
        raw: Self::SCALE / 2,
    };

    /// Smallest positive value (2^-16)
    pub const EPSILON: Self = Self { raw: 1 };

    /// Maximum value: 32767.9999847412109375
    pub const MAX: Self = Self { raw: i32::MAX };

    /// Minimum value: -32768.0
    pub const MIN: Self = Self { raw: i32::MIN };
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for FixedPoint32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FixedPoint32 {
    /// Wraps an already scaled raw value. Every bit pattern is a valid value.
    #[inline(always)]
    pub const fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    /// Returns the raw internal value (scaled by 2^16).
    ///
    /// This is the integer that gets persisted and compared across machines.
    #[inline(always)]
    pub const fn to_raw(self) -> i32 {
        self.raw
    }
}

// ============================================================================
// Arithmetic Operations - Addition
// ============================================================================

impl FixedPoint32 {
    /// Wrapping addition on the raw value. This is what `+` does.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        Self {
            raw: self.raw.wrapping_add(rhs.raw),
        }
    }

    /// Checked addition. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.raw.checked_add(rhs.raw) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating addition. Clamps to `MIN`/`MAX` on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self {
            raw: self.raw.saturating_add(rhs.raw),
        }
    }

    /// Checked addition. Returns an error if the sum leaves the range.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn try_add(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_add(rhs) {
            Some(result) => Ok(result),
            None if rhs.raw < 0 => Err(FixedPointError::Underflow),
            None => Err(FixedPointError::Overflow),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Subtraction
// ============================================================================

impl FixedPoint32 {
    /// Wrapping subtraction on the raw value. This is what `-` does.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        Self {
            raw: self.raw.wrapping_sub(rhs.raw),
        }
    }

    /// Checked subtraction. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.raw.checked_sub(rhs.raw) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating subtraction. Clamps to `MIN`/`MAX` on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self {
            raw: self.raw.saturating_sub(rhs.raw),
        }
    }

    /// Checked subtraction. Returns an error if the difference leaves the range.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn try_sub(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_sub(rhs) {
            Some(result) => Ok(result),
            None if rhs.raw > 0 => Err(FixedPointError::Underflow),
            None => Err(FixedPointError::Overflow),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Multiplication
// ============================================================================

impl FixedPoint32 {
    /// Multiplies two raw values through a full 64-bit product.
    ///
    /// The product must fit in 47 bits plus sign (16 fraction bits, one
    /// rounding bit and 31 value bits) or the result is out of range.
    /// Negative products are decremented before the shift so that exact
    /// halves round away from zero on both sides.
    ///
    /// # Returns
    /// Returns `None` if the rounded result does not fit in i32
    #[inline(always)]
    const fn mul_raw(a: i32, b: i32) -> Option<i32> {
        let mut product = (a as i64) * (b as i64);
        let upper = (product >> 47) as u32;

        if product < 0 {
            if upper != u32::MAX {
                return None;
            }
            product -= 1;
        } else if upper != 0 {
            return None;
        }

        let result = (product >> Self::FRAC_BITS) + ((product & 0x8000) >> 15);

        // The rounding carry can push a positive product just below 2^47 past i32::MAX
        if result > i32::MAX as i64 {
            return None;
        }

        Some(result as i32)
    }

    /// Checked multiplication. Returns `None` if the product is out of range.
    ///
    /// Products in `[-2^47 - 32768, -2^47)` also return `None`, although they
    /// round to exactly `MIN`; `saturating_mul` returns `MIN` for them.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_mul(self, rhs: Self) -> Option<Self> {
        match Self::mul_raw(self.raw, rhs.raw) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating multiplication. This is what `*` does.
    ///
    /// An out of range product clamps toward the sign of the true result:
    /// `MAX` when the operands share a sign, `MIN` otherwise.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_mul(self, rhs: Self) -> Self {
        match Self::mul_raw(self.raw, rhs.raw) {
            Some(raw) => Self { raw },
            None => {
                if (self.raw ^ rhs.raw) < 0 {
                    Self::MIN
                } else {
                    Self::MAX
                }
            }
        }
    }

    /// Checked multiplication. Returns an error if the product is out of range.
    ///
    /// Like `checked_mul`, products in `[-2^47 - 32768, -2^47)` report
    /// `Underflow` even though they round to exactly `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn try_mul(self, rhs: Self) -> crate::Result<Self> {
        match self.checked_mul(rhs) {
            Some(result) => Ok(result),
            None if (self.raw ^ rhs.raw) < 0 => Err(FixedPointError::Underflow),
            None => Err(FixedPointError::Overflow),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Negation
// ============================================================================

impl FixedPoint32 {
    /// Wrapping negation. `MIN` maps to itself. This is what unary `-` does.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_neg(self) -> Self {
        Self {
            raw: self.raw.wrapping_neg(),
        }
    }

    /// Checked negation. Returns `None` for `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.raw.checked_neg() {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating negation. `MIN` maps to `MAX`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_neg(self) -> Self {
        Self {
            raw: self.raw.saturating_neg(),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Absolute Value
// ============================================================================

impl FixedPoint32 {
    /// Returns the absolute value of `self` without branching.
    ///
    /// Follows two's-complement integer semantics: `MIN.abs()` is `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn abs(self) -> Self {
        let mask = self.raw >> 31;
        Self {
            raw: self.raw.wrapping_add(mask) ^ mask,
        }
    }

    /// Checked absolute value. Returns `None` for `MIN`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_abs(self) -> Option<Self> {
        if self.raw == i32::MIN {
            None
        } else {
            Some(self.abs())
        }
    }

    /// Saturating absolute value. `MIN` maps to `MAX`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_abs(self) -> Self {
        if self.raw == i32::MIN {
            Self::MAX
        } else {
            self.abs()
        }
    }
}

// ============================================================================
// Sign Operations
// ============================================================================

impl FixedPoint32 {
    /// Returns `true` if `self` is positive.
    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.raw > 0
    }

    /// Returns `true` if `self` is negative.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.raw < 0
    }

    /// Returns `true` if `self` is zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.raw == 0
    }

    /// Returns `ONE`, `ZERO` or `MINUS_ONE` depending on the sign of `self`.
    #[inline(always)]
    pub const fn signum(self) -> Self {
        if self.raw > 0 {
            Self::ONE
        } else if self.raw < 0 {
            Self::MINUS_ONE
        } else {
            Self::ZERO
        }
    }
}

// ============================================================================
// Comparison Utilities
// ============================================================================

impl FixedPoint32 {
    /// Returns the minimum of two values.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn min(self, other: Self) -> Self {
        if self.raw < other.raw { self } else { other }
    }

    /// Returns the maximum of two values.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn max(self, other: Self) -> Self {
        if self.raw > other.raw { self } else { other }
    }

    /// Restricts a value to `[min, max]`, computed as `self.max(min).min(max)`.
    ///
    /// Never panics. If `min > max` the result is `max`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    /// Restricts a value to `[ZERO, ONE]`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn clamp01(self) -> Self {
        if self.raw < Self::ZERO.raw {
            Self::ZERO
        } else if self.raw > Self::ONE.raw {
            Self::ONE
        } else {
            self
        }
    }
}

// ============================================================================
// Rounding Operations
// ============================================================================

impl FixedPoint32 {
    /// Returns the largest integer less than or equal to `self`.
    ///
    /// Clearing the fraction bits floors negative values too.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn floor(self) -> Self {
        Self {
            raw: self.raw & !Self::FRAC_MASK,
        }
    }

    /// Returns the smallest integer greater than or equal to `self`.
    ///
    /// Wraps for fractional values above 32767, like `+`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn ceil(self) -> Self {
        let has_fraction = ((self.raw & Self::FRAC_MASK) != 0) as i32;
        Self {
            raw: (self.raw & !Self::FRAC_MASK).wrapping_add(has_fraction << Self::FRAC_BITS),
        }
    }

    /// Checked ceiling. Returns `None` for fractional values above 32767.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_ceil(self) -> Option<Self> {
        if self.raw & Self::FRAC_MASK == 0 {
            return Some(self);
        }
        match (self.raw & !Self::FRAC_MASK).checked_add(Self::SCALE) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Returns the integer part of `self`, rounding toward zero.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn trunc(self) -> Self {
        let raw = self.raw as i64;
        let truncated = if raw < 0 {
            -((-raw) & !(Self::FRAC_MASK as i64))
        } else {
            raw & !(Self::FRAC_MASK as i64)
        };
        Self {
            raw: truncated as i32,
        }
    }

    /// Returns the distance from `self.floor()` to `self`, always in `[0, 1)`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn fract(self) -> Self {
        Self {
            raw: self.raw & Self::FRAC_MASK,
        }
    }

    /// Rounds to the nearest integer, halves away from zero.
    ///
    /// Wraps for values at or above 32767.5, like `+`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn round(self) -> Self {
        let raw = self.raw as i64;
        let half = (Self::SCALE / 2) as i64;
        let mask = !(Self::FRAC_MASK as i64);
        let rounded = if raw < 0 {
            -((half - raw) & mask)
        } else {
            (raw + half) & mask
        };
        Self {
            raw: rounded as i32,
        }
    }
}

// ============================================================================
// Integer Conversions
// ============================================================================

impl FixedPoint32 {
    /// Creates a value from an i16 integer (always succeeds).
    #[inline(always)]
    pub const fn from_int(value: i16) -> Self {
        Self {
            raw: (value as i32) << Self::FRAC_BITS,
        }
    }

    /// Creates a value from an i32 integer.
    ///
    /// Returns `None` outside `-32768..=32767`.
    #[inline(always)]
    pub const fn from_i32(value: i32) -> Option<Self> {
        if value < i16::MIN as i32 || value > i16::MAX as i32 {
            None
        } else {
            Some(Self {
                raw: value << Self::FRAC_BITS,
            })
        }
    }

    /// Creates a value from an i32, returning an error when out of range.
    #[inline(always)]
    pub const fn try_from_i32(value: i32) -> crate::Result<Self> {
        match Self::from_i32(value) {
            Some(v) => Ok(v),
            None if value < 0 => Err(FixedPointError::Underflow),
            None => Err(FixedPointError::Overflow),
        }
    }

    /// Converts to i32, rounding toward negative infinity.
    #[inline(always)]
    pub const fn to_i32_floor(self) -> i32 {
        self.raw >> Self::FRAC_BITS
    }

    /// Converts to i32, discarding the fractional part.
    #[inline(always)]
    pub const fn to_i32_trunc(self) -> i32 {
        self.trunc().raw >> Self::FRAC_BITS
    }

    /// Converts to f64 for tooling and debugging output.
    ///
    /// Exact, since every Q16.16 value fits in an f64 mantissa. There is no
    /// `from_f64`: simulation state must never be derived from floats.
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / Self::SCALE as f64
    }
}

// ============================================================================
// Decimal Conversions
// ============================================================================

impl FixedPoint32 {
    /// Returns the exact base-10 value of `raw / 65536`.
    ///
    /// One raw step is exactly `0.0000152587890625`, so the decimal is built
    /// from an integer mantissa at scale 16 and never passes through a float.
    pub fn to_decimal(self) -> Decimal {
        let mantissa = self.raw as i128 * Self::DECIMAL_STEP as i128;
        Decimal::from_i128_with_scale(mantissa, Self::DECIMALS as u32).normalize()
    }

    /// Converts a decimal to the nearest Q16.16 value, ties away from zero.
    ///
    /// Values that are exactly representable convert without loss.
    ///
    /// # Errors
    /// Returns `FixedPointError::Overflow` above `MAX` and
    /// `FixedPointError::Underflow` below `MIN`.
    pub fn from_decimal(value: Decimal) -> crate::Result<Self> {
        // |mantissa| < 2^96, so the scaled value stays below 2^112
        let scaled = value.mantissa() * Self::SCALE as i128;
        let divisor = 10i128.pow(value.scale());

        let quotient = scaled / divisor;
        let remainder = scaled % divisor;

        let rounded = if remainder.unsigned_abs() * 2 >= divisor as u128 {
            quotient + scaled.signum()
        } else {
            quotient
        };

        match i32::try_from(rounded) {
            Ok(raw) => Ok(Self { raw }),
            Err(_) if rounded < 0 => Err(FixedPointError::Underflow),
            Err(_) => Err(FixedPointError::Overflow),
        }
    }
}

// ============================================================================
// String Parsing and Formatting
// ============================================================================

impl FixedPoint32 {
    /// Fraction digits that decide the result; later digits cannot move it.
    const PARSE_DIGITS: u32 = Self::FRAC_BITS + 1;

    /// Parses a decimal string into the nearest Q16.16 value, ties away from zero.
    ///
    /// Supports formats like: "3", "1.5", "-0.25", "+32767.5", ".5"
    ///
    /// Only plain decimal notation is accepted: no exponents, no digit
    /// separators, no trailing decimal point. Any number of fraction digits
    /// may be given and the rounding is still exact.
    ///
    /// # Errors
    /// Returns `FixedPointError::InvalidFormat` if the string is not a valid decimal.
    /// Returns `FixedPointError::Overflow`/`Underflow` if the value is out of range.
    pub fn from_str_exact(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();

        let (is_negative, digits) = match bytes.first() {
            Some(b'-') => (true, &bytes[1..]),
            Some(b'+') => (false, &bytes[1..]),
            Some(_) => (false, bytes),
            None => return Err(FixedPointError::InvalidFormat),
        };

        let (int_slice, frac_slice) = match digits.iter().position(|&b| b == b'.') {
            Some(dp) => (&digits[..dp], Some(&digits[dp + 1..])),
            None => (digits, None),
        };

        if int_slice.is_empty() && frac_slice.is_none_or(|frac| frac.is_empty()) {
            return Err(FixedPointError::InvalidFormat);
        }

        // Saturates instead of wrapping; anything past 32768 is out of range anyway
        let mut integer_part = 0u64;
        for &byte in int_slice {
            let digit = byte.wrapping_sub(b'0');
            if digit > 9 {
                return Err(FixedPointError::InvalidFormat);
            }
            integer_part = integer_part.saturating_mul(10).saturating_add(digit as u64);
        }

        // floor(fraction * 2^17) only depends on the first 17 digits, since
        // 10^17 is a multiple of 2^17. Bit 0 of it is the rounding bit.
        let mut leading = 0u64;
        let mut taken = 0u32;
        if let Some(frac) = frac_slice {
            if frac.is_empty() {
                return Err(FixedPointError::InvalidFormat);
            }
            for &byte in frac {
                let digit = byte.wrapping_sub(b'0');
                if digit > 9 {
                    return Err(FixedPointError::InvalidFormat);
                }
                if taken < Self::PARSE_DIGITS {
                    leading = leading * 10 + digit as u64;
                    taken += 1;
                }
            }
        }
        leading *= 10u64.pow(Self::PARSE_DIGITS - taken);

        let doubled = ((leading as u128) << Self::PARSE_DIGITS) / 10u128.pow(Self::PARSE_DIGITS);
        let fraction = ((doubled as u64) + 1) >> 1;

        let magnitude = integer_part
            .saturating_mul(Self::SCALE as u64)
            .saturating_add(fraction);

        if is_negative {
            if magnitude > i32::MIN.unsigned_abs() as u64 {
                return Err(FixedPointError::Underflow);
            }
            Ok(Self {
                raw: (magnitude as i64).wrapping_neg() as i32,
            })
        } else {
            if magnitude > i32::MAX as u64 {
                return Err(FixedPointError::Overflow);
            }
            Ok(Self {
                raw: magnitude as i32,
            })
        }
    }

    /// Splits `self` into its absolute integer part and its fraction as
    /// sixteen decimal digits.
    #[inline(always)]
    const fn decimal_parts(self) -> (u32, u64) {
        let abs_value = self.raw.unsigned_abs();
        let integer_part = abs_value >> Self::FRAC_BITS;
        let fractional_digits = (abs_value & Self::FRAC_MASK as u32) as u64 * Self::DECIMAL_STEP;
        (integer_part, fractional_digits)
    }

    // Helper for precision formatting (not the hot path)
    //
    // Output length can exceed any fixed buffer for large precisions, so width
    // and alignment are applied by hand instead of through `f.pad`.
    fn fmt_with_precision(&self, f: &mut fmt::Formatter<'_>, precision: usize) -> fmt::Result {
        let sign = if self.raw < 0 { "-" } else { "" };
        let (integer_part, fractional_digits) = self.decimal_parts();
        let decimals = Self::DECIMALS as usize;

        // Round half away from zero at the requested digit
        let mut integer_part = integer_part as u64;
        let mut frac = fractional_digits;
        if precision < decimals {
            let divisor = 10u64.pow((decimals - precision) as u32);
            frac = fractional_digits / divisor;
            if (fractional_digits % divisor) * 2 >= divisor {
                frac += 1;
            }
            if frac == 10u64.pow(precision as u32) {
                integer_part += 1;
                frac = 0;
            }
        }

        let int_len = integer_part.checked_ilog10().map_or(1, |log| log as usize + 1);
        let frac_len = if precision > 0 { precision + 1 } else { 0 };
        let len = sign.len() + int_len + frac_len;
        let padding = f.width().map_or(0, |width| width.saturating_sub(len));

        let (before, after, fill) = if f.sign_aware_zero_pad() {
            f.write_str(sign)?;
            (padding, 0, '0')
        } else {
            match f.align() {
                Some(fmt::Alignment::Left) => (0, padding, f.fill()),
                Some(fmt::Alignment::Center) => (padding / 2, padding - padding / 2, f.fill()),
                _ => (padding, 0, f.fill()),
            }
        };

        for _ in 0..before {
            f.write_char(fill)?;
        }
        if !f.sign_aware_zero_pad() {
            f.write_str(sign)?;
        }

        write!(f, "{integer_part}")?;
        if precision >= decimals {
            write!(f, ".{frac:016}")?;
            for _ in decimals..precision {
                f.write_char('0')?;
            }
        } else if precision > 0 {
            write!(f, ".{frac:0precision$}")?;
        }

        for _ in 0..after {
            f.write_char(fill)?;
        }
        Ok(())
    }
}

impl FromStr for FixedPoint32 {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_exact(s)
    }
}

// ============================================================================
// Bytes Operations
// ============================================================================

impl FixedPoint32 {
    /// The size of this type in bytes.
    pub const BYTES: usize = core::mem::size_of::<i32>();

    /// Creates a value from its raw representation as a little endian byte array.
    ///
    /// Little endian is the canonical persisted layout.
    #[inline(always)]
    pub const fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self {
            raw: i32::from_le_bytes(bytes),
        }
    }

    /// Creates a value from its raw representation as a big endian byte array.
    #[inline(always)]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self {
            raw: i32::from_be_bytes(bytes),
        }
    }

    /// Returns the raw value as a little endian byte array.
    #[inline(always)]
    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.raw.to_le_bytes()
    }

    /// Returns the raw value as a big endian byte array.
    #[inline(always)]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.raw.to_be_bytes()
    }

    /// Writes the raw value as little endian bytes at the start of `buf`.
    ///
    /// Returns `None` if `buf` is shorter than `Self::BYTES`.
    #[inline(always)]
    pub fn try_write_le_bytes(&self, buf: &mut [u8]) -> Option<()> {
        buf.get_mut(..Self::BYTES)?
            .copy_from_slice(&self.to_le_bytes());
        Some(())
    }

    /// Reads a value from little endian bytes at the start of `buf`.
    ///
    /// Returns `None` if `buf` is shorter than `Self::BYTES`.
    #[inline(always)]
    pub fn try_read_le_bytes(buf: &[u8]) -> Option<Self> {
        let bytes: [u8; 4] = buf.get(..Self::BYTES)?.try_into().ok()?;
        Some(Self::from_le_bytes(bytes))
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

impl Add for FixedPoint32 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.wrapping_add(rhs)
    }
}

impl Sub for FixedPoint32 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.wrapping_sub(rhs)
    }
}

impl Mul for FixedPoint32 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        self.saturating_mul(rhs)
    }
}

impl Neg for FixedPoint32 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.wrapping_neg()
    }
}

impl AddAssign for FixedPoint32 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedPoint32 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for FixedPoint32 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

// ============================================================================
// Trait Conversions
// ============================================================================

impl From<i16> for FixedPoint32 {
    #[inline(always)]
    fn from(value: i16) -> Self {
        Self::from_int(value)
    }
}

impl From<i8> for FixedPoint32 {
    #[inline(always)]
    fn from(value: i8) -> Self {
        Self::from_int(value as i16)
    }
}

impl From<u8> for FixedPoint32 {
    #[inline(always)]
    fn from(value: u8) -> Self {
        Self::from_int(value as i16)
    }
}

impl TryFrom<i32> for FixedPoint32 {
    type Error = FixedPointError;

    #[inline(always)]
    fn try_from(value: i32) -> crate::Result<Self> {
        Self::try_from_i32(value)
    }
}

impl TryFrom<Decimal> for FixedPoint32 {
    type Error = FixedPointError;

    fn try_from(value: Decimal) -> crate::Result<Self> {
        Self::from_decimal(value)
    }
}

impl From<FixedPoint32> for Decimal {
    fn from(value: FixedPoint32) -> Self {
        value.to_decimal()
    }
}

impl fmt::Display for FixedPoint32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            return self.fmt_with_precision(f, precision);
        }

        if self.raw == 0 {
            return f.pad("0");
        }

        let (integer_part, fractional_digits) = self.decimal_parts();

        // Longest output is "-32767.9999847412109375"
        let mut buffer = [0u8; 24];
        let mut pos = 0;

        if self.raw < 0 {
            buffer[pos] = b'-';
            pos += 1;
        }

        if integer_part == 0 {
            buffer[pos] = b'0';
            pos += 1;
        } else {
            let start = pos;
            let mut n = integer_part;
            while n > 0 {
                buffer[pos] = b'0' + (n % 10) as u8;
                n /= 10;
                pos += 1;
            }
            buffer[start..pos].reverse();
        }

        if fractional_digits > 0 {
            buffer[pos] = b'.';
            pos += 1;

            let mut frac = fractional_digits;
            let mut digits = Self::DECIMALS as usize;
            while frac % 10 == 0 {
                frac /= 10;
                digits -= 1;
            }

            // Fill right to left so leading zeros come for free
            for i in (pos..pos + digits).rev() {
                buffer[i] = b'0' + (frac % 10) as u8;
                frac /= 10;
            }
            pos += digits;
        }

        let s = core::str::from_utf8(&buffer[..pos]).map_err(|_| fmt::Error)?;
        f.pad(s)
    }
}

impl fmt::Debug for FixedPoint32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw internals
            f.debug_struct("FixedPoint32")
                .field("raw", &self.raw)
                .finish()
        } else {
            write!(f, "FixedPoint32({})", self)
        }
    }
}

// ============================================================================
// Iterator Trait Implementations
// ============================================================================

impl Sum for FixedPoint32 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a FixedPoint32> for FixedPoint32 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for FixedPoint32 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a FixedPoint32> for FixedPoint32 {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}

// ============================================================================
// Serde Support
// ============================================================================

// Every format, text included, carries the raw i32 so round trips stay bit-exact.

#[cfg(feature = "serde")]
impl Serialize for FixedPoint32 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.raw)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for FixedPoint32 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i32::deserialize(deserializer)?;
        Ok(Self { raw })
    }
}





#[cfg(test)]
mod rounding_tests {
    use super::*;

    fn fp(s: &str) -> FixedPoint32 {
        FixedPoint32::from_str(s).unwrap()
    }

    #[test]
    fn test_floor() {
        assert_eq!(fp("1.75").floor(), fp("1.0"));
        assert_eq!(fp("-1.25").floor(), fp("-2.0"));
        assert_eq!(fp("2").floor(), fp("2"));
        assert_eq!(fp("-2").floor(), fp("-2"));
        assert_eq!(FixedPoint32::from_raw(-1).floor(), FixedPoint32::MINUS_ONE);
        assert_eq!(FixedPoint32::MIN.floor(), FixedPoint32::MIN);
    }

    #[test]
    fn test_ceil() {
        assert_eq!(fp("1.25").ceil(), fp("2.0"));
        assert_eq!(fp("-1.25").ceil(), fp("-1.0"));
        assert_eq!(fp("3").ceil(), fp("3"));
        assert_eq!(FixedPoint32::EPSILON.ceil(), FixedPoint32::ONE);
        assert_eq!(FixedPoint32::from_raw(-1).ceil(), FixedPoint32::ZERO);
    }

    #[test]
    fn test_ceil_top_of_range() {
        // 32767.x has no integer above it in range
        assert_eq!(FixedPoint32::MAX.ceil(), FixedPoint32::MIN);
        assert_eq!(FixedPoint32::MAX.checked_ceil(), None);
        assert_eq!(fp("1.5").checked_ceil(), Some(fp("2")));
        assert_eq!(fp("7").checked_ceil(), Some(fp("7")));
    }

    #[test]
    fn test_trunc() {
        assert_eq!(fp("1.75").trunc(), fp("1"));
        assert_eq!(fp("-1.75").trunc(), fp("-1"));
        assert_eq!(FixedPoint32::MIN.trunc(), FixedPoint32::MIN);
        assert_eq!(FixedPoint32::MAX.trunc(), FixedPoint32::from_int(i16::MAX));
    }

    #[test]
    fn test_fract() {
        assert_eq!(fp("1.75").fract(), fp("0.75"));
        assert_eq!(fp("-1.25").fract(), fp("0.75"));

        let x = fp("-7.3");
        assert_eq!(x.floor() + x.fract(), x);
    }

    #[test]
    fn test_round() {
        assert_eq!(fp("1.5").round(), fp("2"));
        assert_eq!(fp("-1.5").round(), fp("-2"));
        assert_eq!(fp("2.4999").round(), fp("2"));
        assert_eq!(fp("-2.4999").round(), fp("-2"));
        assert_eq!(fp("0.5").round(), fp("1"));
        assert_eq!(FixedPoint32::MIN.round(), FixedPoint32::MIN);
    }
}

#[cfg(test)]
mod result_tests {
    use super::*;

    #[test]
    fn test_try_add() {
        assert_eq!(
            FixedPoint32::ONE.try_add(FixedPoint32::ONE),
            Ok(FixedPoint32::from_int(2))
        );
        assert_eq!(
            FixedPoint32::MAX.try_add(FixedPoint32::ONE),
            Err(FixedPointError::Overflow)
        );
        assert_eq!(
            FixedPoint32::MIN.try_add(FixedPoint32::MINUS_ONE),
            Err(FixedPointError::Underflow)
        );
    }

    #[test]
    fn test_try_sub() {
        assert_eq!(
            FixedPoint32::ONE.try_sub(FixedPoint32::ONE),
            Ok(FixedPoint32::ZERO)
        );
        assert_eq!(
            FixedPoint32::MIN.try_sub(FixedPoint32::ONE),
            Err(FixedPointError::Underflow)
        );
        assert_eq!(
            FixedPoint32::MAX.try_sub(FixedPoint32::MINUS_ONE),
            Err(FixedPointError::Overflow)
        );
    }

    #[test]
    fn test_try_mul() {
        assert_eq!(
            FixedPoint32::HALF.try_mul(FixedPoint32::HALF),
            Ok(FixedPoint32::from_raw(16_384))
        );
        assert_eq!(
            FixedPoint32::MAX.try_mul(FixedPoint32::MAX),
            Err(FixedPointError::Overflow)
        );
        assert_eq!(
            FixedPoint32::MAX.try_mul(FixedPoint32::MIN),
            Err(FixedPointError::Underflow)
        );
    }
}
