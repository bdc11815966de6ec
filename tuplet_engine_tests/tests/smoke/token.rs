use anyhow::Result;
use tuplet_engine::prelude::*;
use tuplet_engine::TupleError;

#[allow(dead_code)]
#[repr(C, packed)]
struct Foo {
    x: u8,
    bar: i32,
}

static_token!(FooBar = Foo { bar: i32 } as Genus::I32, tag 1);

fn probe_static<T: StaticToken>(_: &T) -> bool {
    true
}

#[test]
fn static_preplaced() {
    assert_eq!(1, FooBar::OFFSET);
    assert!(FooBar::is_static_preplaced());
    assert!(probe_static(&FooBar));

    let token = FooBar::TOKEN;
    assert!(token.is_preplaced());
    assert!(!token.is_loose());
    assert!(!token.is_inlay());
    assert!(!token.is_collection());
    assert_eq!(Genus::I32, token.genus());
}

#[test]
fn collection_required_on_empty_tuple() {
    let ro = TupleRoWeak::default();
    assert_eq!(
        Some(TupleError::CollectionRequired {
            genus: Genus::I32,
            tag: 1
        }),
        ro.collection(FooBar).err()
    );
}

#[test]
fn static_offset_matches_schema_scan() -> Result<()> {
    let schema = Schema::builder()
        .field(Genus::U8, 0)
        .static_field::<FooBar>()
        .layout_of::<Foo>()
        .build()?;

    let desc = schema
        .lookup(FooBar::TOKEN.genus(), FooBar::TOKEN.tag())
        .ok_or_else(|| anyhow::anyhow!("static field not declared"))?;
    assert_eq!(FooBar::OFFSET, desc.offset);

    let mut rw = TupleRwFixed::new(schema);
    rw.set_i32(FooBar, -42)?;
    assert_eq!(Some(-42), rw.get_i32(Token::preplaced(Genus::I32, 1))?);
    assert_eq!(Some(-42), rw.get_integer(FooBar)?);
    Ok(())
}
