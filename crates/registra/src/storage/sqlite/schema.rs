//! SQLite schema definitions and SQL query constants.
//!
//! All static SQL lives here; queries with runtime-dependent predicates
//! (listing filters, selective deletes, graph filters) are assembled in the
//! repository from the fragments below.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Employees table; initials are the natural key for idempotent upsert
CREATE TABLE IF NOT EXISTS employees (
    uid INTEGER PRIMARY KEY AUTOINCREMENT,
    office TEXT NOT NULL,
    fullname TEXT NOT NULL,
    position_title TEXT NOT NULL,
    initial TEXT NOT NULL UNIQUE,
    fund_source TEXT NOT NULL DEFAULT ''
);

-- Travel authorities table
CREATE TABLE IF NOT EXISTS travels (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER,
    initial TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    position_designation TEXT NOT NULL,
    station TEXT NOT NULL,
    purpose TEXT NOT NULL,
    host TEXT NOT NULL,
    dates_from TEXT,
    dates_to TEXT,
    destination TEXT NOT NULL,
    area TEXT NOT NULL,
    fund_source TEXT NOT NULL,
    attachment TEXT,
    FOREIGN KEY (employee_id) REFERENCES employees(uid) ON DELETE SET NULL
);

-- Appointments table
CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    position_title TEXT NOT NULL,
    status TEXT NOT NULL,
    school_office TEXT NOT NULL,
    nature TEXT NOT NULL DEFAULT '',
    item_no TEXT NOT NULL DEFAULT '',
    date_signed TEXT,
    attachment TEXT
);

-- Indexes for report and filter queries
CREATE INDEX IF NOT EXISTS idx_travels_employee_id ON travels(employee_id);
CREATE INDEX IF NOT EXISTS idx_travels_dates_from ON travels(dates_from);
CREATE INDEX IF NOT EXISTS idx_appointments_date_signed ON appointments(date_signed);
"#;

// Employee queries
pub const INSERT_EMPLOYEE: &str = r#"
INSERT OR IGNORE INTO employees (office, fullname, position_title, initial, fund_source)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_EMPLOYEES: &str = r#"
SELECT uid, office, fullname, position_title, initial, fund_source
FROM employees
ORDER BY uid
"#;

pub const DELETE_EMPLOYEE: &str = r#"
DELETE FROM employees
WHERE uid = ?1
"#;

// Travel queries
pub const INSERT_TRAVEL: &str = r#"
INSERT INTO travels (
    employee_id, initial, name, position_designation, station, purpose, host,
    dates_from, dates_to, destination, area, fund_source, attachment
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

/// Listing resolves the traveler name from the employees table when the
/// record carries an employee id and no denormalized sheet name.
pub const SELECT_TRAVELS: &str = r#"
SELECT t.id, t.employee_id,
       CASE WHEN t.initial != '' THEN t.initial ELSE COALESCE(e.initial, '') END AS initial,
       CASE WHEN t.name != '' THEN t.name ELSE COALESCE(e.fullname, '') END AS name,
       t.position_designation, t.station, t.purpose, t.host,
       t.dates_from, t.dates_to, t.destination, t.area, t.fund_source, t.attachment
FROM travels t
LEFT JOIN employees e ON e.uid = t.employee_id
ORDER BY t.id
"#;

pub const SELECT_TRAVEL_COLUMNS: &str = r#"
SELECT id, employee_id, initial, name, position_designation, station, purpose, host,
       dates_from, dates_to, destination, area, fund_source, attachment
FROM travels
"#;

pub const SELECT_TRAVEL_ATTACHMENT: &str = r#"
SELECT attachment
FROM travels
WHERE id = ?1
"#;

pub const UPDATE_TRAVEL: &str = r#"
UPDATE travels
SET employee_id = ?2, position_designation = ?3, station = ?4, purpose = ?5,
    host = ?6, dates_from = ?7, dates_to = ?8, destination = ?9, area = ?10,
    fund_source = ?11, attachment = ?12
WHERE id = ?1
"#;

pub const DELETE_TRAVEL: &str = r#"
DELETE FROM travels
WHERE id = ?1
"#;

pub const DELETE_ALL_TRAVELS: &str = r#"
DELETE FROM travels
"#;

pub const SELECT_TRAVEL_GRAPH_DATES: &str = r#"
SELECT dates_from
FROM travels
WHERE dates_from IS NOT NULL
"#;

// Appointment queries
pub const INSERT_APPOINTMENT: &str = r#"
INSERT INTO appointments (name, position_title, status, school_office, nature, item_no, date_signed, attachment)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_APPOINTMENTS: &str = r#"
SELECT id, name, position_title, status, school_office, nature, item_no, date_signed, attachment
FROM appointments
ORDER BY id
"#;

pub const SELECT_APPOINTMENT_ATTACHMENT: &str = r#"
SELECT attachment
FROM appointments
WHERE id = ?1
"#;

pub const UPDATE_APPOINTMENT: &str = r#"
UPDATE appointments
SET name = ?2, position_title = ?3, status = ?4, school_office = ?5,
    nature = ?6, item_no = ?7, date_signed = ?8, attachment = ?9
WHERE id = ?1
"#;

pub const SET_APPOINTMENT_ATTACHMENT: &str = r#"
UPDATE appointments
SET attachment = ?2
WHERE id = ?1
"#;

pub const DELETE_APPOINTMENT: &str = r#"
DELETE FROM appointments
WHERE id = ?1
"#;

pub const SELECT_APPOINTMENT_GRAPH_DATES: &str = r#"
SELECT date_signed
FROM appointments
WHERE date_signed IS NOT NULL
"#;
