mod property_distribution_tests;
