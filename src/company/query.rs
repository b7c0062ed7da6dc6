pub const INSERT_COMPANY: &str = "
    INSERT INTO companies (handle, name, description, num_employees, logo_url)
    VALUES (?1, ?2, ?3, ?4, ?5)
";

pub const SELECT_COMPANIES: &str = "
    SELECT handle, name, description, num_employees, logo_url
    FROM companies
";

pub const GET_COMPANY_BY_HANDLE: &str = "
    SELECT handle, name, description, num_employees, logo_url
    FROM companies
    WHERE handle = ?1
";

pub const DELETE_COMPANY: &str = "
    DELETE
    FROM companies
    WHERE handle = ?1
";

pub const GET_COMPANY_JOBS: &str = "
    SELECT id, title, salary, equity
    FROM jobs
    WHERE company_handle = ?1
    ORDER BY id
";
