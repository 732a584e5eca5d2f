// src/aerolattice/physics/numerics.rs

/// 保号分母钳位: 幅值低于容差时钳到容差, 保留符号
#[inline(always)]
pub fn clamp_denominator(value: f64, tol: f64) -> f64 {
    if value.abs() < tol {
        tol.copysign(value)
    } else {
        value
    }
}

/// 统计非有限项个数
#[inline]
pub fn count_non_finite<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().filter(|v| !v.is_finite()).count()
}

#[inline]
pub fn relative_error(value: f64, reference: f64) -> f64 {
    if reference.abs() < 1e-12 {
        value.abs()
    } else {
        (value - reference).abs() / reference.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_preserves_sign() {
        assert_eq!(clamp_denominator(1e-12, 1e-6), 1e-6);
        assert_eq!(clamp_denominator(-1e-12, 1e-6), -1e-6);
        assert_eq!(clamp_denominator(0.5, 1e-6), 0.5);
        assert_eq!(clamp_denominator(-0.5, 1e-6), -0.5);
    }

    #[test]
    fn test_clamp_zero_stays_positive_tol() {
        // 0.0 的符号位为正
        assert_eq!(clamp_denominator(0.0, 1e-6), 1e-6);
    }

    #[test]
    fn test_count_non_finite() {
        let values = [1.0, f64::NAN, 2.0, f64::INFINITY];
        assert_eq!(count_non_finite(values.iter()), 2);
    }

    #[test]
    fn test_relative_error() {
        assert_eq!(relative_error(100.0, 100.0), 0.0);
        assert!((relative_error(101.0, 100.0) - 0.01).abs() < 1e-10);
        assert_eq!(relative_error(1e-15, 0.0), 1e-15);
    }
}
