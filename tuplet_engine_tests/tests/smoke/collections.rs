use anyhow::Result;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use tuplet_engine::prelude::*;
use tuplet_engine::{PropertyPair, TupleError};

const SCORES: Token = Token::collection(Genus::I16, 5);
const LABELS: Token = Token::collection(Genus::Property, 6);
const CHILDREN: Token = Token::inlay_collection(7);

#[test]
fn collection_order_and_restart() -> Result<()> {
    let mut rng = rand::thread_rng();
    let scores = (0..50).map(|_| rng.gen::<i16>()).collect_vec();

    let mut rw = TupleRwManaged::default();
    for (i, score) in scores.iter().enumerate() {
        rw.insert_i16(SCORES, *score)?;
        if i % 10 == 0 {
            rw.insert_property(LABELS, PropertyPair::new("tenth", i as i8))?;
        }
    }

    let coll = rw.collection(SCORES)?;
    let first = coll.clone().values::<i16>().collect::<Result<Vec<_>, _>>()?;
    let second = coll.values::<i16>().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(scores, first);
    assert_eq!(first, second);

    let labels = rw
        .collection(LABELS)?
        .values::<PropertyPair>()
        .map_ok(|p| p.value)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(vec![0, 10, 20, 30, 40], labels);
    Ok(())
}

#[test]
fn only_collection_tokens_iterate() -> Result<()> {
    let rw = TupleRwManaged::default();
    let tokens = [
        Token::new(Genus::I16, 5),
        Token::preplaced(Genus::I16, 5),
        Token::inlay(7),
    ];
    for token in tokens {
        assert!(matches!(
            rw.collection(token),
            Err(TupleError::CollectionRequired { .. })
        ));
    }
    assert!(rw.collection(SCORES)?.is_empty());
    Ok(())
}

#[test]
fn nested_children() -> Result<()> {
    let mut names = vec!["alpha", "beta", "gamma", "delta"];
    names.shuffle(&mut rand::thread_rng());

    let mut parent = TupleRwManaged::default();
    for name in names.iter() {
        let mut child = TupleRwFixed::with_capacity(Schema::empty(), 64);
        child.set_string(Token::new(Genus::Text, 0), name)?;
        parent.insert_nested(CHILDREN, &child)?;
    }
    let ro = parent.move_to_ro();

    let read = ro
        .collection(CHILDREN)?
        .map(|view| -> Result<String> {
            let child = view.nested()?;
            let name = child.require::<&str, _>(Token::new(Genus::Text, 0))?;
            Ok(name.to_string())
        })
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(names, read);
    Ok(())
}

#[test]
fn remove_whole_collection() -> Result<()> {
    let mut rw = TupleRwFixed::default();
    for score in [1, 2, 3] {
        rw.insert_i16(SCORES, score)?;
    }
    rw.insert_property(LABELS, PropertyPair::new("keep", 1))?;

    assert_eq!(3, rw.remove(SCORES)?);
    assert!(rw.collection(SCORES)?.is_empty());
    assert_eq!(1, rw.collection(LABELS)?.count());
    Ok(())
}
