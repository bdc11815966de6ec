#[cfg(test)]
mod test {
    use super::super::*;
    use crate::static_token;
    use std::collections::HashSet;

    #[allow(dead_code)]
    #[repr(C, packed)]
    struct Foo {
        x: u8,
        bar: i32,
        baz: u64,
    }

    static_token!(FooBar = Foo { bar: i32 } as Genus::I32, tag 1);
    static_token!(FooBaz = Foo { baz: u64 } as Genus::U64, tag 2);

    fn probe_static<T: StaticToken>(_: &T) -> bool {
        true
    }

    #[test]
    fn static_preplaced() {
        assert_eq!(1, FooBar::OFFSET);
        assert_eq!(5, FooBaz::OFFSET);
        assert!(FooBar::is_static_preplaced());
        assert!(probe_static(&FooBar));

        let token = FooBar::TOKEN;
        assert!(token.is_preplaced());
        assert!(!token.is_loose());
        assert!(!token.is_inlay());
        assert!(!token.is_collection());
        assert_eq!(Genus::I32, token.genus());

        match FooBar.address() {
            Address::Static(slot) => {
                assert_eq!(1, slot.offset());
                assert_eq!(token, slot.token());
            }
            Address::Dynamic(_) => panic!("static token resolved dynamically"),
        }
    }

    #[test]
    fn flavors() {
        let loose = Token::new(Genus::Text, 3);
        assert!(loose.is_loose() && !loose.is_collection() && !loose.is_inlay());

        let coll = Token::collection(Genus::Text, 3);
        assert!(coll.is_loose() && coll.is_collection());

        let pre = Token::preplaced(Genus::U16, 3);
        assert!(pre.is_preplaced());
        assert_eq!(TokenFlags::empty(), pre.flags());

        let inlay = Token::inlay(9);
        assert_eq!(Genus::Nested, inlay.genus());
        assert!(inlay.is_inlay() && inlay.is_loose() && !inlay.is_collection());
        assert!(Token::inlay_collection(9).is_collection());

        assert_eq!(Address::Dynamic(loose), loose.address());
        assert_eq!(Address::Dynamic(loose), (&loose).address());
    }

    #[test]
    fn equality_covers_every_flag() {
        let tokens = [
            Token::new(Genus::Text, 3),
            Token::collection(Genus::Text, 3),
            Token::preplaced(Genus::Text, 3),
            Token::new(Genus::Varbin, 3),
            Token::new(Genus::Text, 4),
            Token::inlay(3),
            Token::inlay_collection(3),
            Token::new(Genus::Nested, 3),
        ];
        let distinct = tokens.iter().collect::<HashSet<_>>();
        assert_eq!(tokens.len(), distinct.len());
        assert_eq!(Token::new(Genus::Text, 3), Token::new(Genus::Text, 3));
    }

    #[test]
    fn display() {
        assert_eq!("U16#7 (preplaced)", Token::preplaced(Genus::U16, 7).to_string());
        assert_eq!("Text#0 (loose)", Token::new(Genus::Text, 0).to_string());
        assert_eq!("Text#0 (collection)", Token::collection(Genus::Text, 0).to_string());
    }
}
