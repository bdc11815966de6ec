#[cfg(test)]
mod test {
    use super::super::*;
    use std::time::Duration;

    #[test]
    fn fixed_point_parts() {
        let dt = Datetime::from_duration(Duration::new(1_500_000_000, 500_000_000));
        assert_eq!(1_500_000_000, dt.seconds());
        assert_eq!(1u64 << 31, dt.fixedpoint() & 0xffff_ffff);
        assert_eq!(500_000_000, dt.nanoseconds());
        assert_eq!(Datetime::from_seconds(7).fixedpoint(), 7u64 << 32);
    }

    #[test]
    fn clocks_are_ordered() {
        let coarse = Datetime::now_coarse();
        let fine = Datetime::now_fine();
        assert!(coarse <= fine);
        assert!(coarse.seconds() > 0);
    }

    #[test]
    fn duration_precision() {
        let d = Duration::new(42, 123_456_789);
        let back = Datetime::from_duration(d).to_duration();
        let diff = if back > d { back - d } else { d - back };
        assert!(diff < Duration::from_nanos(2), "{d:?} vs {back:?}");
    }
}
