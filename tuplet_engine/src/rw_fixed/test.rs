#[cfg(test)]
mod test {
    use super::super::*;
    use crate::limits::LOOSE_ENTRY_HEADER_BYTES;
    use crate::token::Token;
    use anyhow::Result;
    use tuplet_types::Genus;

    const BLOB: Token = Token::collection(Genus::Varbin, 0);

    #[test]
    fn overflow_fails_without_writing() -> Result<()> {
        let mut tup = TupleRwFixed::with_capacity(Schema::empty(), 64);
        assert_eq!(64, tup.capacity());

        tup.insert_bytes(BLOB, &[1; 24])?;
        tup.insert_bytes(BLOB, &[2; 24])?;
        assert_eq!(2 * (LOOSE_ENTRY_HEADER_BYTES + 24), tup.used());
        let before = tup.image().to_vec();

        assert_eq!(
            Err(TupleError::CapacityExceeded {
                needed: 2 * 32 + 8 + 1,
                capacity: 64,
                ceiling: 64
            }),
            tup.insert_bytes(BLOB, &[3; 1])
        );
        let upsert = Token::new(Genus::Varbin, 0);
        assert!(tup.set_bytes(upsert, &[9; 25]).is_err());
        assert_eq!(before, tup.image());
        assert_eq!(64, tup.capacity());

        // Shrinking in place always fits.
        tup.set_bytes(upsert, &[9; 4])?;
        tup.insert_bytes(BLOB, &[3; 12])?;
        assert_eq!(64, tup.used());
        Ok(())
    }

    #[test]
    fn capacity_covers_preplaced_region() -> Result<()> {
        let schema = Schema::builder().field(Genus::Bin256, 0).build()?;
        let tup = TupleRwFixed::with_capacity(schema, 8);
        assert_eq!(32, tup.capacity());
        assert_eq!(32, tup.used());
        Ok(())
    }

    #[test]
    fn clone_from_ro_is_deep() -> Result<()> {
        let mut tup = TupleRwFixed::default();
        tup.insert_bytes(BLOB, b"abc")?;
        let (ro, _) = tup.take_managed_clone();

        let mut copy = TupleRwFixed::clone_from_ro(&ro);
        assert_eq!(ro.data(), copy.image());
        assert_eq!(DEFAULT_INITIAL_CAPACITY, copy.capacity());

        copy.insert_bytes(BLOB, b"def")?;
        assert_eq!(1, ro.loose_count());
        assert_eq!(2, copy.loose_count());
        assert_eq!(1, ro.ref_counter());
        Ok(())
    }

    #[test]
    fn reallocates_after_move() -> Result<()> {
        let mut tup = TupleRwFixed::with_config(
            Schema::empty(),
            TupleConfig {
                initial_capacity: 100,
                ..TupleConfig::default()
            },
        );
        tup.insert_bytes(BLOB, b"x")?;
        let ro = tup.move_to_ro();
        assert_eq!(0, tup.size());

        // A failing mutation leaves the moved-out builder unallocated.
        assert!(matches!(
            tup.insert_bytes(BLOB, &[0; 200]),
            Err(TupleError::CapacityExceeded { needed: 208, .. })
        ));
        assert!(tup.set_bytes(Token::new(Genus::Varbin, 1), &[0; 200]).is_err());
        assert_eq!(0, tup.size());
        assert_eq!(0, tup.capacity());

        tup.insert_bytes(BLOB, b"y")?;
        assert_eq!(100, tup.capacity());
        assert_eq!(1, tup.loose_count());
        assert_eq!(1, ro.loose_count());
        Ok(())
    }

    #[test]
    fn keeps_writing_after_reclaim() -> Result<()> {
        let mut tup = TupleRwFixed::default();
        tup.set_u16(Token::new(Genus::U16, 0), 7)?;
        let (ro, _) = tup.take_managed_clone();

        let mut back = TupleRwFixed::from(ro);
        assert_eq!(DEFAULT_INITIAL_CAPACITY, back.capacity());
        back.insert_u8(Token::new(Genus::U8, 1), 1)?;
        assert_eq!(Some(7), back.get_u16(Token::new(Genus::U16, 0))?);
        assert_eq!(Some(1), back.get_u8(Token::new(Genus::U8, 1))?);
        Ok(())
    }
}
