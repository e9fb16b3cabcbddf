//! Embedded historical station table for the 1761 and 1769 transits.
//!
//! Contact instants are the observers' reported UTC-equivalent timings,
//! reduced to the modern calendar; empty fields mark contacts the record
//! does not supply. Coordinates are modern values for the historical
//! sites, east longitude positive.

use once_cell::sync::OnceCell;

use super::{parse_stations, ObservationPoint};

// One row per station; columns match the loader's raw-row layout.
const STATION_TABLE_CSV: &str = "\
year,name,observer,telescope,latitude,longitude,elevation_m,contact1,contact2,contact3,contact4,accuracy,notes
1761,Stockholm,Pehr Wargentin,21 ft achromatic refractor,59.342,18.055,45,1761-06-06T02:21:05Z,1761-06-06T02:40:10Z,1761-06-06T08:36:20Z,1761-06-06T08:58:25Z,good,Clear sky; black drop reported at second contact
1761,Tobolsk,Jean-Baptiste Chappe d'Auteroche,19 ft Dollond refractor,58.195,68.258,92,1761-06-06T02:23:40Z,1761-06-06T02:42:55Z,1761-06-06T08:39:05Z,1761-06-06T09:00:10Z,good,Expedition across Siberia for the Academie des Sciences
1761,Cape of Good Hope,Charles Mason & Jeremiah Dixon,2 ft Gregorian reflector,-33.926,18.424,15,1761-06-06T02:15:30Z,1761-06-06T02:36:20Z,1761-06-06T08:33:45Z,1761-06-06T08:54:05Z,excellent,Diverted from Sumatra after an attack at sea
1761,Rodrigues Island,Alexandre-Guy Pingre,quadrant and small refractor,-19.683,63.417,30,1761-06-06T02:17:10Z,1761-06-06T02:37:45Z,1761-06-06T08:34:50Z,1761-06-06T08:55:40Z,fair,Intermittent cloud near third contact
1761,St Helena,Nevil Maskelyne,Bird mural quadrant,-15.942,-5.718,640,,,,,none,Overcast at both internal contacts; no usable timings
1769,Point Venus,James Cook & Charles Green,Short Gregorian reflector,-17.494,-149.499,3,1769-06-03T19:17:20Z,1769-06-03T19:36:45Z,1769-06-04T01:07:35Z,1769-06-04T01:26:50Z,good,Endeavour voyage; black drop troublesome at ingress
1769,Vardo,Maximilian Hell,10 ft refractor,70.371,31.108,12,1769-06-03T19:12:40Z,1769-06-03T19:31:05Z,1769-06-04T01:03:50Z,1769-06-04T01:22:40Z,good,Midnight-sun observation above the Arctic Circle
1769,Prince of Wales Fort,William Wales & Joseph Dymond,2 ft Gregorian reflector,58.795,-94.205,10,1769-06-03T19:16:30Z,1769-06-03T19:35:20Z,1769-06-04T01:06:55Z,1769-06-04T01:25:45Z,good,Hudson Bay winter-over expedition
1769,San Jose del Cabo,Jean-Baptiste Chappe d'Auteroche,3 ft achromatic refractor,23.063,-109.697,35,1769-06-03T19:18:05Z,1769-06-03T19:37:10Z,1769-06-04T01:08:20Z,1769-06-04T01:27:15Z,excellent,Expedition struck by epidemic shortly after the transit
1769,Norriton,David Rittenhouse,home-built refractor,40.122,-75.343,90,1769-06-03T19:14:10Z,1769-06-03T19:33:25Z,1769-06-04T01:05:10Z,1769-06-04T01:24:05Z,fair,American Philosophical Society observation
";

static STATIONS: OnceCell<Vec<ObservationPoint>> = OnceCell::new();

/// The full historical station table, parsed once.
pub fn stations() -> &'static [ObservationPoint] {
    STATIONS
        .get_or_init(|| {
            parse_stations(STATION_TABLE_CSV).expect("embedded station table is well-formed")
        })
        .as_slice()
}

#[cfg(test)]
mod stations_test {
    use super::*;

    #[test]
    fn test_embedded_table_parses() {
        let all = stations();
        assert_eq!(all.len(), 10);
        // Chappe observed both transits, seven years and a hemisphere apart.
        assert_eq!(
            all.iter()
                .filter(|p| p.observer.contains("Chappe"))
                .count(),
            2
        );
    }

    #[test]
    fn test_coordinates_in_range() {
        for point in stations() {
            let lat = point.latitude.into_inner();
            let lon = point.longitude.into_inner();
            assert!((-90.0..=90.0).contains(&lat), "{}", point.name);
            assert!((-180.0..=180.0).contains(&lon), "{}", point.name);
        }
    }
}
