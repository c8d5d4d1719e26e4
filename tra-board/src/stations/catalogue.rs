//! Static TRA station catalogue for the station picker.

use crate::domain::StationId;

/// A station the picker offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Station {
    /// TDX station code
    pub code: &'static str,
    /// Chinese name
    pub name: &'static str,
}

impl Station {
    pub fn id(&self) -> Option<StationId> {
        StationId::parse(self.code).ok()
    }
}

/// Stations grouped under one county or city.
#[derive(Debug, Clone, Copy)]
pub struct County {
    pub name: &'static str,
    pub stations: &'static [Station],
}

const fn s(code: &'static str, name: &'static str) -> Station {
    Station { code, name }
}

/// Major stations by county, north to south then east.
pub static COUNTIES: &[County] = &[
    County {
        name: "基隆市",
        stations: &[s("0900", "基隆")],
    },
    County {
        name: "臺北市",
        stations: &[s("1000", "臺北"), s("1010", "萬華")],
    },
    County {
        name: "新北市",
        stations: &[s("1020", "板橋")],
    },
    County {
        name: "桃園市",
        stations: &[s("1080", "桃園"), s("1100", "中壢")],
    },
    County {
        name: "新竹市",
        stations: &[s("1210", "新竹")],
    },
    County {
        name: "苗栗縣",
        stations: &[s("3160", "苗栗")],
    },
    County {
        name: "臺中市",
        stations: &[s("3300", "臺中")],
    },
    County {
        name: "彰化縣",
        stations: &[s("3360", "彰化")],
    },
    County {
        name: "嘉義市",
        stations: &[s("4080", "嘉義")],
    },
    County {
        name: "臺南市",
        stations: &[s("4220", "臺南")],
    },
    County {
        name: "高雄市",
        stations: &[s("4340", "新左營"), s("4400", "高雄")],
    },
    County {
        name: "屏東縣",
        stations: &[s("5000", "屏東")],
    },
    County {
        name: "臺東縣",
        stations: &[s("6000", "臺東")],
    },
    County {
        name: "花蓮縣",
        stations: &[s("7000", "花蓮")],
    },
    County {
        name: "宜蘭縣",
        stations: &[s("7190", "宜蘭")],
    },
];

/// Look up a catalogue station by code.
pub fn find(id: &StationId) -> Option<&'static Station> {
    COUNTIES
        .iter()
        .flat_map(|c| c.stations.iter())
        .find(|s| s.code == id.as_str())
}
