use anyhow::Result;
use tuplet_engine::prelude::*;
use tuplet_engine::Datetime;

const COARSE: Token = Token::new(Genus::DatetimeUtc, 0);
const FINE: Token = Token::new(Genus::DatetimeUtc, 1);
const I64: Token = Token::new(Genus::I64, 0);

fn snapshot(rw: &impl TupleWrite) -> Vec<u8> {
    let (weak, size) = rw.take_weak();
    assert_eq!(size, weak.size());
    weak.data().to_vec()
}

#[test]
fn trivia_managing() -> Result<()> {
    crate::init_logging();

    let mut rw_fixed = TupleRwFixed::default();
    rw_fixed.set_datetime(COARSE, Datetime::now())?;
    rw_fixed.set_datetime(COARSE, Datetime::now_coarse())?;
    rw_fixed.set_datetime(FINE, Datetime::now_fine())?;
    rw_fixed.set_integer(I64, i64::MIN)?;
    rw_fixed.set_integer(I64, i64::MAX)?;

    {
        let (ro_weak, _) = rw_fixed.take_weak();
        assert!(!ro_weak.is_empty());
        assert!(ro_weak.is_present(COARSE)?);
        assert!(ro_weak.is_present(FINE)?);
        assert!(ro_weak.is_present(I64)?);
        assert_eq!(3, ro_weak.loose_count());
    }
    let expected = snapshot(&rw_fixed);

    let (ro_managed, size) = rw_fixed.take_managed_clone();
    assert_eq!(expected.len(), size);
    assert_eq!(expected, ro_managed.data());

    let ro_managed = rw_fixed.move_to_ro();
    assert_eq!(expected, ro_managed.data());

    // Ownership comes back to a builder without a copy.
    let mut rw_fixed = TupleRwFixed::from(ro_managed);
    let (ro_managed, _) = rw_fixed.take_managed_clone();
    assert_eq!(expected, ro_managed.data());

    rw_fixed = TupleRwFixed::clone_from_ro(&ro_managed);
    assert_eq!(expected, snapshot(&rw_fixed));

    let ro_weak_bytes = snapshot(&rw_fixed);
    let ro_weak = TupleRoWeak::from_bytes(&ro_weak_bytes, Schema::empty())?;
    rw_fixed = TupleRwFixed::clone_from_ro(&ro_weak);
    assert_eq!(expected, snapshot(&rw_fixed));
    assert_eq!(Some(i64::MAX), rw_fixed.get_integer(I64)?);

    assert_eq!(1, ro_managed.ref_counter());
    let ro_managed2 = ro_managed.clone();
    assert_eq!(2, ro_managed.ref_counter());
    let mut ro_managed = ro_managed;
    ro_managed.purge();
    assert!(!ro_managed.has_buffer());
    assert!(ro_managed.is_empty());
    assert_eq!(1, ro_managed2.ref_counter());
    assert_eq!(expected, ro_managed2.data());
    Ok(())
}

#[test]
fn round_trips_preserve_content() -> Result<()> {
    let mut rw = TupleRwManaged::default();
    rw.set_string(Token::new(Genus::Text, 1), "round")?;
    rw.insert_u32(Token::collection(Genus::U32, 2), 1)?;
    rw.insert_u32(Token::collection(Genus::U32, 2), 2)?;
    let expected = snapshot(&rw);

    let mut ro = rw.move_to_ro();
    for _ in 0..3 {
        let rw = TupleRwManaged::clone_from_ro(&ro);
        assert_eq!(expected.len(), rw.size());
        ro = rw.take_managed_clone().0;
        assert_eq!(expected, ro.data());
    }

    let values = ro
        .collection(Token::collection(Genus::U32, 2))?
        .values::<u32>()
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(vec![1, 2], values);
    Ok(())
}

#[test]
fn weak_and_managed_views_agree() -> Result<()> {
    let schema = Schema::builder()
        .field(Genus::U64, 0)
        .field(Genus::Uuid, 1)
        .build()?;
    let mut rw = TupleRwManaged::new(schema);
    rw.set_u64(Token::preplaced(Genus::U64, 0), 7)?;
    rw.set_uuid(
        Token::preplaced(Genus::Uuid, 1),
        tuplet_engine::types::Uuid([3; 16]),
    )?;
    rw.insert_bytes(Token::new(Genus::Varbin, 0), &[1, 2, 3])?;

    let (managed, managed_size) = rw.take_managed_clone();
    let (weak, weak_size) = rw.take_weak();
    assert_eq!(weak_size, managed_size);
    assert_eq!(weak.data(), managed.data());
    assert_eq!(weak.schema(), managed.schema());
    Ok(())
}
