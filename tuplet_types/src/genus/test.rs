#[cfg(test)]
mod test {
    use super::super::*;

    #[test]
    fn codes_are_dense_and_stable() {
        for (i, genus) in Genus::ALL.iter().enumerate() {
            let int = GenusInt::from(*genus);
            assert_eq!(i as u8, *int);
            assert_eq!(Ok(*genus), Genus::try_from(int));
        }
        assert_eq!(
            Err(ValueError::UnknownGenus(28)),
            Genus::try_from(GenusInt::from(28u8))
        );
    }

    #[test]
    fn shapes() {
        assert_eq!(WireShape::Variable, Genus::Text.shape());
        assert_eq!(WireShape::Variable, Genus::Varbin.shape());
        assert_eq!(WireShape::Nested, Genus::Nested.shape());
        assert_eq!(WireShape::Nested, Genus::Property.shape());
        assert_eq!(WireShape::Fixed(2), Genus::U16.shape());
        assert_eq!(WireShape::Fixed(8), Genus::DatetimeUtc.shape());
        assert_eq!(WireShape::Fixed(17), Genus::IpNet.shape());
        assert_eq!(WireShape::Fixed(32), Genus::Bin256.shape());

        for genus in Genus::ALL {
            assert_eq!(genus.is_fixed(), matches!(genus.shape(), WireShape::Fixed(_)));
        }
    }

    #[test]
    fn integer_classes() {
        let signed = Genus::ALL
            .iter()
            .filter(|g| g.is_signed_integer())
            .count();
        let unsigned = Genus::ALL
            .iter()
            .filter(|g| g.is_unsigned_integer())
            .count();
        assert_eq!(4, signed);
        assert_eq!(4, unsigned);
        assert!(!Genus::I128.is_signed_integer());
    }
}
