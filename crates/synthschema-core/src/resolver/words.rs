//! Built-in word lists backing the generator catalog.

pub(crate) const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Carlos", "Karen", "Daniel", "Lisa", "Matthew", "Nancy", "Anthony", "Sandra", "Mark", "Ashley",
    "Kevin", "Emily", "Brian", "Michelle", "Omar", "Aisha", "Wei", "Mei", "Raj", "Priya", "Diego",
    "Sofia", "Luca", "Chiara", "Hiroshi", "Yuki", "Noah", "Olivia", "Liam", "Emma",
];

pub(crate) const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Nguyen", "Patel", "Kim", "Chen", "Singh", "Rossi", "Tanaka", "Okafor", "Novak",
];

pub(crate) const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

pub(crate) const FREE_EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

pub(crate) const TLDS: &[&str] = &["com", "net", "org", "io", "biz", "info"];

pub(crate) const STREET_NAMES: &[&str] = &[
    "Oak", "Maple", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill", "Park", "Main",
    "Sunset", "River", "Spring", "Church", "Highland", "Meadow", "Forest", "Willow", "Mill",
];

pub(crate) const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Lane", "Drive", "Court", "Boulevard", "Way", "Place", "Terrace",
];

pub(crate) const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton", "Fairview",
    "Salem", "Madison", "Georgetown", "Arlington", "Ashland", "Dover", "Oxford", "Jackson",
    "Burlington", "Manchester", "Milton", "Newport", "Auburn", "Dayton", "Lexington",
];

pub(crate) const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Arizona", "AZ"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Illinois", "IL"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("Ohio", "OH"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Texas", "TX"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
];

pub(crate) const COUNTRIES: &[(&str, &str)] = &[
    ("United States", "US"),
    ("Canada", "CA"),
    ("Mexico", "MX"),
    ("Brazil", "BR"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Germany", "DE"),
    ("Italy", "IT"),
    ("Spain", "ES"),
    ("Netherlands", "NL"),
    ("Sweden", "SE"),
    ("Poland", "PL"),
    ("India", "IN"),
    ("Japan", "JP"),
    ("South Korea", "KR"),
    ("Australia", "AU"),
    ("Nigeria", "NG"),
    ("Egypt", "EG"),
];

pub(crate) const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "voluptate",
    "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint", "occaecat",
];

pub(crate) const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Ltd", "Group", "PLC", "and Sons"];

pub(crate) const JOBS: &[&str] = &[
    "Software Engineer", "Data Analyst", "Accountant", "Nurse", "Teacher", "Product Manager",
    "Graphic Designer", "Sales Representative", "Marketing Manager", "Civil Engineer",
    "Pharmacist", "Electrician", "Financial Advisor", "Operations Manager", "HR Specialist",
    "Customer Support Agent", "Architect", "Research Scientist", "Paralegal", "Chef",
];

pub(crate) const DEPARTMENTS: &[&str] = &[
    "Sales", "Marketing", "Engineering", "HR", "Finance", "Operations",
];

pub(crate) const CATCH_ADJECTIVES: &[&str] = &[
    "Adaptive", "Balanced", "Centralized", "Decentralized", "Ergonomic", "Integrated", "Robust",
    "Seamless", "Streamlined", "Versatile", "Proactive", "Scalable",
];

pub(crate) const CATCH_NOUNS: &[&str] = &[
    "architecture", "framework", "paradigm", "solution", "toolset", "workforce", "interface",
    "methodology", "platform", "infrastructure",
];

pub(crate) const BS_VERBS: &[&str] = &[
    "synergize", "leverage", "streamline", "empower", "monetize", "orchestrate", "incubate",
];

pub(crate) const BS_NOUNS: &[&str] = &[
    "platforms", "deliverables", "paradigms", "channels", "experiences", "markets", "metrics",
];

pub(crate) const COLORS: &[&str] = &[
    "Red", "Blue", "Green", "Yellow", "Orange", "Purple", "Black", "White", "Gray", "Navy",
    "Teal", "Maroon", "Olive", "Silver", "Coral", "Indigo", "Beige", "Turquoise",
];

pub(crate) const PRODUCT_ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Practical", "Handcrafted", "Refined", "Compact", "Premium",
    "Durable", "Lightweight", "Smart", "Classic",
];

pub(crate) const PRODUCT_MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Cotton", "Leather", "Granite", "Plastic", "Bamboo", "Concrete", "Wool",
];

pub(crate) const PRODUCT_NOUNS: &[&str] = &[
    "Chair", "Table", "Lamp", "Keyboard", "Backpack", "Bottle", "Jacket", "Headphones", "Watch",
    "Shoes", "Gloves", "Speaker", "Wallet", "Blender", "Monitor", "Tent",
];

pub(crate) const CURRENCY_CODES: &[&str] = &["USD", "EUR", "GBP", "CAD", "JPY", "AUD", "CHF"];

pub(crate) const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub(crate) const WEEKDAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
