#[cfg(test)]
mod test {
    use super::super::*;
    use crate::error::TupleError;
    use crate::rw_managed::TupleRwManaged;
    use crate::token::Token;
    use crate::write::TupleWrite;
    use anyhow::Result;
    use tuplet_types::Genus;

    #[test]
    fn from_bytes_validates() -> Result<()> {
        let schema = Schema::builder().field(Genus::U8, 0).build()?;
        let mut tup = TupleRwManaged::new(Arc::clone(&schema));
        tup.set_u8(Token::preplaced(Genus::U8, 0), 3)?;
        tup.insert_string(Token::new(Genus::Text, 1), "hello")?;
        let bytes = tup.image().to_vec();

        let view = TupleRoWeak::from_bytes(&bytes, Arc::clone(&schema))?;
        assert_eq!(Some(3), view.get_u8(Token::preplaced(Genus::U8, 0))?);
        assert_eq!(Some("hello"), view.get_string(Token::new(Genus::Text, 1))?);

        let truncated = &bytes[..bytes.len() - 2];
        assert!(matches!(
            TupleRoWeak::from_bytes(truncated, Arc::clone(&schema)),
            Err(TupleError::Malformed { .. })
        ));
        assert!(TupleRoWeak::from_bytes(&bytes, Schema::empty()).is_err());
        Ok(())
    }

    #[test]
    fn empty_slice_is_empty_tuple() -> Result<()> {
        let view = TupleRoWeak::from_bytes(&[], Schema::empty())?;
        assert!(view.is_empty());
        assert_eq!(0, view.size());
        assert_eq!(0, view.loose_count());
        assert_eq!(None, view.get_string(Token::new(Genus::Text, 0))?);

        let default = TupleRoWeak::default();
        assert!(default.is_empty());
        assert!(default.data().is_empty());
        Ok(())
    }

    #[test]
    fn data_outlives_view() -> Result<()> {
        let bytes = {
            let mut tup = TupleRwManaged::default();
            tup.insert_string(Token::new(Genus::Text, 0), "x")?;
            tup.image().to_vec()
        };
        let data = {
            let view = TupleRoWeak::from_bytes(&bytes, Schema::empty())?;
            view.data()
        };
        assert_eq!(bytes.as_slice(), data);
        Ok(())
    }
}
