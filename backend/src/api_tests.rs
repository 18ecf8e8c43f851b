#[cfg(test)]
mod tests {
    use crate::api::BuildingId;

    #[test]
    fn test_building_id_new() {
        let id = BuildingId::new(42).unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn test_building_id_rejects_non_positive() {
        assert!(BuildingId::new(0).is_none());
        assert!(BuildingId::new(-7).is_none());
        assert!(BuildingId::try_from(-1i64).is_err());
    }

    #[test]
    fn test_building_id_ordering() {
        let id1 = BuildingId::new(1).unwrap();
        let id2 = BuildingId::new(2).unwrap();
        assert!(id1 < id2);
    }

    #[test]
    fn test_building_id_from_str() {
        assert_eq!("17".parse::<BuildingId>().unwrap().value(), 17);
        assert!("0".parse::<BuildingId>().is_err());
        assert!("abc".parse::<BuildingId>().is_err());
    }

    #[test]
    fn test_building_id_display() {
        let id = BuildingId::new(123).unwrap();
        assert_eq!(format!("{}", id), "123");
    }

    #[test]
    fn test_building_id_serde() {
        let id = BuildingId::new(9).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        let parsed: BuildingId = serde_json::from_str("9").unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<BuildingId>("0").is_err());
    }
}
