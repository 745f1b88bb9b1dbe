//! Derive macros, see [`Mappable`].

pub use fm_access_derive::Mappable;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Mappable;
    use crate::info::{MemberKind, Mutability, Type, Visibility};
    use crate::registry::{GetTypeMeta, TypeRegistry};
    use crate::table::AccessorResolver;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[derive(Mappable, Default)]
    #[mappable(default)]
    #[mappable(property(name = "prop", ty = String, get = Sample::prop, set = Sample::set_prop))]
    struct Sample {
        pub field: String,
        prop_value: String,
    }

    impl Sample {
        fn prop(&self) -> String {
            self.prop_value.clone()
        }

        fn set_prop(&mut self, value: String) {
            self.prop_value = value;
        }
    }

    #[derive(Mappable)]
    #[mappable(constructor = Ticket::issue)]
    struct Ticket {
        #[mappable(readonly)]
        pub id: u64,
        #[mappable(rename = "Owner")]
        pub owner: String,
        #[mappable(skip)]
        #[allow(dead_code)]
        scratch: Vec<u8>,
    }

    impl Ticket {
        fn issue() -> Self {
            Self {
                id: 7,
                owner: String::new(),
                scratch: Vec::new(),
            }
        }
    }

    #[derive(Mappable, Default)]
    #[mappable(default)]
    struct Pair(pub u8, pub i16);

    #[derive(Mappable)]
    struct Wrapper<T> {
        pub inner: T,
    }

    #[derive(Mappable)]
    #[mappable(property(name = "len", ty = usize, get = Wrapper2::len))]
    struct Wrapper2 {
        items: Vec<u8>,
    }

    impl Wrapper2 {
        fn len(&self) -> usize {
            self.items.len()
        }
    }

    fn names(ty: Type, registry: &TypeRegistry) -> Vec<&'static str> {
        registry
            .get(ty.id())
            .unwrap()
            .members()
            .iter()
            .map(|m| m.name())
            .collect()
    }

    #[test]
    fn derived_members() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Sample>();
        registry.register::<Ticket>();
        registry.register::<Pair>();

        assert_eq!(names(Type::of::<Sample>(), &registry), ["field", "prop_value", "prop"]);
        assert_eq!(names(Type::of::<Ticket>(), &registry), ["id", "Owner"]);
        assert_eq!(names(Type::of::<Pair>(), &registry), ["0", "1"]);

        let sample = Sample::get_type_meta();
        assert_eq!(sample.member("prop_value").unwrap().visibility(), Visibility::Private);
        assert_eq!(sample.member("prop").unwrap().kind(), MemberKind::Property);
        assert_eq!(
            Ticket::get_type_meta().member("id").unwrap().mutability(),
            Mutability::ReadOnly
        );
    }

    #[test]
    fn sample_end_to_end() {
        let mut registry = TypeRegistry::new();
        registry.register::<Sample>();
        let resolver = AccessorResolver::new(registry);

        let table = resolver.resolve::<Sample>().unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|pair| pair.can_read() && pair.can_write()));

        let mut instance = resolver.construct(Type::of::<Sample>()).unwrap();
        let field = table.get("field").unwrap();
        field.setter().unwrap().set_value(instance.as_mut(), String::from("x")).unwrap();
        assert_eq!(
            field.getter().unwrap().get_as::<String>(instance.as_ref()).unwrap(),
            "x"
        );

        let prop = table.get("prop").unwrap();
        prop.setter().unwrap().set_value(instance.as_mut(), String::from("y")).unwrap();
        assert_eq!(prop.getter().unwrap().get_as::<String>(instance.as_ref()).unwrap(), "y");
    }

    #[test]
    fn constructor_and_readonly() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Ticket>();
        registry.register::<Wrapper<u32>>();
        let resolver = AccessorResolver::new(registry);

        let ticket = resolver.construct_as::<Ticket>().unwrap();
        let id = resolver.accessor(Type::of::<Ticket>(), "id").unwrap();
        assert!(id.setter().is_none());
        assert_eq!(id.getter().unwrap().get_as::<u64>(&ticket), Ok(7));

        assert!(resolver.construct_as::<Wrapper<u32>>().is_err());
        let inner = resolver.accessor(Type::of::<Wrapper<u32>>(), "inner").unwrap();
        assert_eq!(inner.value_type(), Type::of::<u32>());
    }

    #[test]
    fn getter_only_property() {
        let meta = Wrapper2::get_type_meta();
        let len = meta.member("len").unwrap();
        assert!(len.is_read_only());
        assert!(len.is_public());
    }
}
