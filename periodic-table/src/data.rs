use crate::ElementRecord;

const fn el(
    symbol: &'static str,
    name: &'static str,
    chinese_name: &'static str,
    atomic_number: u32,
    atomic_weight: f64,
) -> ElementRecord {
    ElementRecord::new(symbol, name, chinese_name, atomic_number, atomic_weight)
}

/// Elements known to [`crate::Directory::builtin`].
pub static BUILTIN_ELEMENTS: &[ElementRecord] = &[
    el("H", "Hydrogen", "氢", 1, 1.008),
    el("He", "Helium", "氦", 2, 4.0026),
    el("Li", "Lithium", "锂", 3, 6.94),
    el("Be", "Beryllium", "铍", 4, 9.0122),
    el("B", "Boron", "硼", 5, 10.81),
    el("C", "Carbon", "碳", 6, 12.011),
    el("N", "Nitrogen", "氮", 7, 14.007),
    el("O", "Oxygen", "氧", 8, 15.999),
    el("F", "Fluorine", "氟", 9, 18.998),
    el("Ne", "Neon", "氖", 10, 20.180),
    el("Na", "Sodium", "钠", 11, 22.990),
    el("Mg", "Magnesium", "镁", 12, 24.305),
    el("Al", "Aluminum", "铝", 13, 26.982),
    el("Si", "Silicon", "硅", 14, 28.085),
    el("P", "Phosphorus", "磷", 15, 30.974),
    el("S", "Sulfur", "硫", 16, 32.06),
    el("Cl", "Chlorine", "氯", 17, 35.45),
    el("Ar", "Argon", "氩", 18, 39.948),
    el("K", "Potassium", "钾", 19, 39.098),
    el("Ca", "Calcium", "钙", 20, 40.078),
    el("Sc", "Scandium", "钪", 21, 44.956),
    el("Ti", "Titanium", "钛", 22, 47.867),
    el("V", "Vanadium", "钒", 23, 50.942),
    el("Cr", "Chromium", "铬", 24, 51.996),
    el("Mn", "Manganese", "锰", 25, 54.938),
    el("Fe", "Iron", "铁", 26, 55.845),
    el("Co", "Cobalt", "钴", 27, 58.933),
    el("Ni", "Nickel", "镍", 28, 58.693),
    el("Cu", "Copper", "铜", 29, 63.546),
    el("Zn", "Zinc", "锌", 30, 65.38),
    el("Ga", "Gallium", "镓", 31, 69.723),
    el("Ge", "Germanium", "锗", 32, 72.630),
    el("As", "Arsenic", "砷", 33, 74.922),
    el("Se", "Selenium", "硒", 34, 78.971),
    el("Br", "Bromine", "溴", 35, 79.904),
    el("Kr", "Krypton", "氪", 36, 83.798),
    el("Rb", "Rubidium", "铷", 37, 85.468),
    el("Sr", "Strontium", "锶", 38, 87.62),
    el("Y", "Yttrium", "钇", 39, 88.906),
    el("Zr", "Zirconium", "锆", 40, 91.224),
    el("Nb", "Niobium", "铌", 41, 92.906),
    el("Mo", "Molybdenum", "钼", 42, 95.95),
    el("Ag", "Silver", "银", 47, 107.87),
    el("Sn", "Tin", "锡", 50, 118.71),
    el("I", "Iodine", "碘", 53, 126.90),
    el("Xe", "Xenon", "氙", 54, 131.29),
    el("Cs", "Cesium", "铯", 55, 132.91),
    el("Ba", "Barium", "钡", 56, 137.33),
    el("Au", "Gold", "金", 79, 196.97),
    el("Hg", "Mercury", "汞", 80, 200.59),
    el("Pb", "Lead", "铅", 82, 207.2),
    el("U", "Uranium", "铀", 92, 238.03),
];
