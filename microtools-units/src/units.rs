//! Category table - the units offered by the converter, organized by category

use std::collections::HashMap;
use std::sync::LazyLock;
use crate::{Category, UnitDef};
use crate::parse::normalize_key;

/// Global category registry
pub static CATEGORIES: LazyLock<CategoryRegistry> = LazyLock::new(CategoryRegistry::new);

const SECONDS_PER_DAY: f64 = 86_400.0;
const KIB: f64 = 1024.0;
/// 30.44 days
const SECONDS_PER_MONTH: f64 = 2_630_016.0;

/// Registry of all known categories, in declaration order
pub struct CategoryRegistry {
    categories: Vec<Category>,
    aliases: HashMap<String, usize>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        let mut registry = CategoryRegistry {
            categories: Vec::new(),
            aliases: HashMap::new(),
        };
        registry.register_all_categories();
        registry
    }

    /// Get a category by id or alias
    pub fn get(&self, name: &str) -> Option<&Category> {
        if let Some(category) = self.categories.iter().find(|c| c.id == name) {
            return Some(category);
        }
        self.aliases.get(&normalize_key(name)).map(|&i| &self.categories[i])
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.categories.iter().map(|c| c.id).collect()
    }

    fn register(&mut self, category: Category, aliases: &[&str]) {
        let index = self.categories.len();
        self.aliases.insert(normalize_key(category.id), index);
        for alias in aliases {
            self.aliases.entry(normalize_key(alias)).or_insert(index);
        }
        self.categories.push(category);
    }

    fn register_all_categories(&mut self) {
        self.register_length();
        self.register_mass();
        self.register_volume();
        self.register_temperature();
        self.register_time();
        self.register_speed();
        self.register_area();
        self.register_data_storage();
    }

    fn register_length(&mut self) {
        let length = Category::new("length", "Length", "meters")
            .with_unit(UnitDef::linear("meters", "Meters (m)", 1.0), &["m", "meter", "metre", "metres"])
            .with_unit(UnitDef::linear("kilometers", "Kilometers (km)", 1000.0), &["km", "kilometer", "kilometre", "kilometres"])
            .with_unit(UnitDef::linear("centimeters", "Centimeters (cm)", 0.01), &["cm", "centimeter", "centimetre"])
            .with_unit(UnitDef::linear("millimeters", "Millimeters (mm)", 0.001), &["mm", "millimeter", "millimetre"])
            .with_unit(UnitDef::linear("miles", "Miles (mi)", 1609.344), &["mi", "mile"])
            .with_unit(UnitDef::linear("yards", "Yards (yd)", 0.9144), &["yd", "yard"])
            .with_unit(UnitDef::linear("feet", "Feet (ft)", 0.3048), &["ft", "foot"])
            .with_unit(UnitDef::linear("inches", "Inches (in)", 0.0254), &["in", "inch"]);
        self.register(length, &["distance"]);
    }

    fn register_mass(&mut self) {
        let mass = Category::new("mass", "Mass", "kilograms")
            .with_unit(UnitDef::linear("kilograms", "Kilograms (kg)", 1.0), &["kg", "kilogram"])
            .with_unit(UnitDef::linear("grams", "Grams (g)", 0.001), &["g", "gram"])
            .with_unit(UnitDef::linear("milligrams", "Milligrams (mg)", 0.000001), &["mg", "milligram"])
            .with_unit(UnitDef::linear("pounds", "Pounds (lb)", 0.45359237), &["lb", "lbs", "pound"])
            .with_unit(UnitDef::linear("ounces", "Ounces (oz)", 0.028349523125), &["oz", "ounce"])
            .with_unit(UnitDef::linear("tonnes", "Metric Tonnes (t)", 1000.0), &["t", "tonne", "metric ton", "metric tons"]);
        self.register(mass, &["weight"]);
    }

    fn register_volume(&mut self) {
        let volume = Category::new("volume", "Volume", "liters")
            .with_unit(UnitDef::linear("liters", "Liters (L)", 1.0), &["l", "liter", "litre", "litres"])
            .with_unit(UnitDef::linear("milliliters", "Milliliters (mL)", 0.001), &["ml", "milliliter", "millilitre"])
            .with_unit(UnitDef::linear("gallons", "US Gallons (gal)", 3.785411784), &["gal", "gallon"])
            .with_unit(UnitDef::linear("quarts", "US Quarts (qt)", 0.946352946), &["qt", "quart"])
            .with_unit(UnitDef::linear("pints", "US Pints (pt)", 0.473176473), &["pt", "pint"])
            .with_unit(UnitDef::linear("cups", "US Cups", 0.2365882365), &["cup"])
            .with_unit(UnitDef::linear("fluid ounces", "US Fluid Ounces (fl oz)", 0.0295735295625), &["fl oz", "floz", "fluid ounce"])
            .with_unit(UnitDef::linear("cubic meters", "Cubic Meters (m³)", 1000.0), &["m3", "m³", "cubic meter", "cubic metre"]);
        self.register(volume, &["capacity"]);
    }

    fn register_temperature(&mut self) {
        let temperature = Category::new("temperature", "Temperature", "celsius")
            .with_unit(UnitDef::affine("celsius", "Celsius (°C)", |c| c, |c| c), &["c", "°c", "degc"])
            .with_unit(
                UnitDef::affine("fahrenheit", "Fahrenheit (°F)", |f| (f - 32.0) * 5.0 / 9.0, |c| c * 9.0 / 5.0 + 32.0),
                &["f", "°f", "degf"],
            )
            .with_unit(UnitDef::affine("kelvin", "Kelvin (K)", |k| k - 273.15, |c| c + 273.15), &["k"]);
        self.register(temperature, &["temp"]);
    }

    fn register_time(&mut self) {
        // Months and years are calendar averages (30.44 and 365.25 days)
        let time = Category::new("time", "Time", "seconds")
            .with_unit(UnitDef::linear("seconds", "Seconds (s)", 1.0), &["s", "sec", "second"])
            .with_unit(UnitDef::linear("milliseconds", "Milliseconds (ms)", 0.001), &["ms", "millisecond"])
            .with_unit(UnitDef::linear("minutes", "Minutes (min)", 60.0), &["min", "minute"])
            .with_unit(UnitDef::linear("hours", "Hours (h)", 3600.0), &["h", "hr", "hour"])
            .with_unit(UnitDef::linear("days", "Days (d)", SECONDS_PER_DAY), &["d", "day"])
            .with_unit(UnitDef::linear("weeks", "Weeks (wk)", 7.0 * SECONDS_PER_DAY), &["wk", "week"])
            .with_unit(UnitDef::linear("months", "Months (avg)", SECONDS_PER_MONTH), &["mo", "month"])
            .with_unit(UnitDef::linear("years", "Years (avg)", 365.25 * SECONDS_PER_DAY), &["yr", "year"]);
        self.register(time, &["duration"]);
    }

    fn register_speed(&mut self) {
        let speed = Category::new("speed", "Speed", "meters per second")
            .with_unit(UnitDef::linear("meters per second", "Meters per Second (m/s)", 1.0), &["m/s", "mps", "meter per second"])
            .with_unit(UnitDef::linear("kilometers per hour", "Kilometers per Hour (km/h)", 1.0 / 3.6), &["km/h", "kph", "kmh", "kilometer per hour"])
            .with_unit(UnitDef::linear("miles per hour", "Miles per Hour (mph)", 0.44704), &["mph", "mi/h", "mile per hour"])
            .with_unit(UnitDef::linear("feet per second", "Feet per Second (ft/s)", 0.3048), &["ft/s", "fps", "foot per second"])
            .with_unit(UnitDef::linear("knots", "Knots (kn)", 1852.0 / 3600.0), &["kn", "kt", "knot"]);
        self.register(speed, &["velocity"]);
    }

    fn register_area(&mut self) {
        let area = Category::new("area", "Area", "square meters")
            .with_unit(UnitDef::linear("square meters", "Square Meters (m²)", 1.0), &["m2", "m²", "sq m", "square meter"])
            .with_unit(UnitDef::linear("square kilometers", "Square Kilometers (km²)", 1_000_000.0), &["km2", "km²", "sq km", "square kilometer"])
            .with_unit(UnitDef::linear("square feet", "Square Feet (ft²)", 0.09290304), &["ft2", "ft²", "sq ft", "square foot"])
            .with_unit(UnitDef::linear("square yards", "Square Yards (yd²)", 0.83612736), &["yd2", "yd²", "sq yd", "square yard"])
            .with_unit(UnitDef::linear("acres", "Acres (ac)", 4046.8564224), &["ac", "acre"])
            .with_unit(UnitDef::linear("hectares", "Hectares (ha)", 10_000.0), &["ha", "hectare"])
            .with_unit(UnitDef::linear("square miles", "Square Miles (mi²)", 2_589_988.110336), &["mi2", "mi²", "sq mi", "square mile"]);
        self.register(area, &[]);
    }

    fn register_data_storage(&mut self) {
        // Binary multiples: 1 KB = 1024 bytes
        let data = Category::new("data storage", "Data Storage", "bytes")
            .with_unit(UnitDef::linear("bytes", "Bytes (B)", 1.0), &["b", "byte"])
            .with_unit(UnitDef::linear("bits", "Bits (bit)", 0.125), &["bit"])
            .with_unit(UnitDef::linear("kilobytes", "Kilobytes (KB)", KIB), &["kb", "kib", "kilobyte"])
            .with_unit(UnitDef::linear("megabytes", "Megabytes (MB)", KIB * KIB), &["mb", "mib", "megabyte"])
            .with_unit(UnitDef::linear("gigabytes", "Gigabytes (GB)", KIB * KIB * KIB), &["gb", "gib", "gigabyte"])
            .with_unit(UnitDef::linear("terabytes", "Terabytes (TB)", KIB * KIB * KIB * KIB), &["tb", "tib", "terabyte"]);
        self.register(data, &["data", "storage", "digital storage"]);
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
