//! Lookup over the preloaded member roster.

use crate::model::Member;

/// A search request as the operator issues it: exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberQuery {
    Dni(u64),
    Legajo(String),
}

/// Read-only directory of roster members. Rosters are small enough that a
/// linear scan beats keeping two keyed maps in sync.
#[derive(Debug, Default, Clone)]
pub struct MemberDirectory {
    members: Vec<Member>,
}

impl MemberDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        MemberDirectory { members }
    }

    pub fn find(&self, query: &MemberQuery) -> Option<&Member> {
        match query {
            MemberQuery::Dni(dni) => self.find_by_dni(*dni),
            MemberQuery::Legajo(legajo) => self.find_by_legajo(legajo),
        }
    }

    pub fn find_by_dni(&self, dni: u64) -> Option<&Member> {
        self.members.iter().find(|member| member.dni == dni)
    }

    pub fn find_by_legajo(&self, legajo: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.legajo == legajo)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn directory() -> MemberDirectory {
        MemberDirectory::new(vec![
            Member {
                dni: 30111222,
                legajo: "A-001".to_string(),
                full_name: "Pérez, Juan".to_string(),
                opening_balance: Decimal::from(1000),
            },
            Member {
                dni: 27888999,
                legajo: "A-002".to_string(),
                full_name: "Gómez, Ana".to_string(),
                opening_balance: "250.5".parse().unwrap(),
            },
        ])
    }

    #[test]
    fn finds_by_dni() {
        let directory = directory();
        assert_eq!(directory.find_by_dni(27888999).unwrap().legajo, "A-002");
        assert!(directory.find_by_dni(1).is_none());
    }

    #[test]
    fn finds_by_exact_legajo() {
        let directory = directory();
        assert_eq!(directory.find_by_legajo("A-001").unwrap().dni, 30111222);
        assert!(directory.find_by_legajo("a-001").is_none());
    }

    #[test]
    fn query_dispatches_on_its_key() {
        let directory = directory();
        let by_dni = directory.find(&MemberQuery::Dni(30111222)).unwrap();
        let by_legajo = directory.find(&MemberQuery::Legajo("A-001".to_string())).unwrap();
        assert_eq!(by_dni, by_legajo);
    }
}
