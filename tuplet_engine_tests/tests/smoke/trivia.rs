use anyhow::Result;
use tuplet_engine::prelude::*;
use tuplet_engine::{TupleError, MAX_TUPLE_BYTES_NETTO};

#[test]
fn trivia_set() -> Result<()> {
    let mut rw = TupleRwManaged::default();
    let token = Token::new(Genus::U16, 0);
    rw.set_u16(token, 42)?;
    assert_eq!(Some(42), rw.get_u16(token)?);
    Ok(())
}

#[test]
fn trivia_autogrowth() -> Result<()> {
    crate::init_logging();

    let mut rw = TupleRwManaged::default();
    let token = Token::collection(Genus::Text, 0);
    assert!(rw.capacity() < MAX_TUPLE_BYTES_NETTO);

    for i in 1..555 {
        let s = format!("This is the string #{:<width$}.", i, width = 555 - i);
        rw.insert_string(token, &s)?;
        assert!(rw.capacity() <= MAX_TUPLE_BYTES_NETTO);
    }
    assert_eq!(MAX_TUPLE_BYTES_NETTO, rw.capacity());
    assert_eq!(554, rw.collection(token)?.count());

    let room = MAX_TUPLE_BYTES_NETTO - rw.used();
    let overflow = "x".repeat(room);
    assert!(matches!(
        rw.insert_string(token, &overflow),
        Err(TupleError::CapacityExceeded { .. })
    ));
    assert_eq!(554, rw.loose_count());
    Ok(())
}

#[test]
fn trivia_fixed_never_grows() -> Result<()> {
    let mut rw = TupleRwFixed::with_capacity(Schema::empty(), 1024);
    let token = Token::collection(Genus::Text, 0);
    let mut inserted = 0;
    let err = loop {
        match rw.insert_string(token, "0123456789") {
            Ok(()) => inserted += 1,
            Err(err) => break err,
        }
    };
    assert!(matches!(err, TupleError::CapacityExceeded { .. }));
    assert_eq!(1024 / 18, inserted);
    assert_eq!(1024, rw.capacity());
    Ok(())
}
